use streamchat_types::*;

#[test]
fn message_constructors_set_role() {
    assert_eq!(Message::system("s").role, Role::System);
    assert_eq!(Message::user("u").role, Role::User);
    assert_eq!(Message::assistant("a").role, Role::Assistant);
}

#[test]
fn message_wire_shape() {
    let msg = Message::user("Hello");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
}

#[test]
fn message_deserializes_from_wire() {
    let msg: Message =
        serde_json::from_str(r#"{"role":"assistant","content":"Hi there"}"#).unwrap();
    assert_eq!(msg, Message::assistant("Hi there"));
}

#[test]
fn seven_models_are_offered() {
    assert_eq!(Model::ALL.len(), 7);
    let ids: Vec<&str> = Model::ALL.iter().map(|m| m.as_str()).collect();
    assert!(ids.contains(&"llama-3.3-70b-instruct"));
    assert!(ids.contains(&"qwen2.5-coder-32b-instruct"));
}

#[test]
fn parameters_for_model_keep_defaults() {
    let params = RequestParameters::for_model(Model::Pixtral12b2409);
    assert_eq!(params.model, Model::Pixtral12b2409);
    assert_eq!(params.max_tokens, RequestParameters::default().max_tokens);
}

#[test]
fn parameters_deserialize_with_model_id() {
    let params: RequestParameters = serde_json::from_value(serde_json::json!({
        "model": "mistral-nemo-instruct-2407",
        "max_tokens": 256,
        "temperature": 0.2,
        "top_p": 0.9,
        "presence_penalty": 0.1
    }))
    .unwrap();
    assert_eq!(params.model, Model::MistralNemoInstruct2407);
    params.validate().unwrap();
}
