//! Turn lifecycle tests against a scripted client.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use streamchat_session::{
    ChatSession, Conversation, DEFAULT_FAILURE_MESSAGE, IgnoreReason, NullSurface, Submission,
};
use streamchat_types::test_utils::{Reply, ScriptedClient};
use streamchat_types::{Message, RequestParameters, Role};

/// Records every snapshot the session renders.
#[derive(Clone, Default)]
struct Recorder {
    frames: Arc<Mutex<Vec<Conversation>>>,
}

impl Recorder {
    fn surface(&self) -> impl Fn(&Conversation) + Send + Sync + 'static {
        let frames = Arc::clone(&self.frames);
        move |c: &Conversation| frames.lock().unwrap().push(c.clone())
    }

    fn frames(&self) -> Vec<Conversation> {
        self.frames.lock().unwrap().clone()
    }
}

fn params() -> RequestParameters {
    RequestParameters::default()
}

#[tokio::test]
async fn fragment_boundaries_do_not_matter() {
    for reply in [
        Reply::fragments(["Hel", "lo, ", "world"]),
        Reply::fragments(["Hello, world"]),
    ] {
        let session = ChatSession::new(ScriptedClient::new([reply]));
        let outcome = session.submit("greet me", &params(), &NullSurface).await;
        assert!(matches!(outcome, Submission::Completed { .. }));
        assert_eq!(
            session.snapshot().last(),
            Some(&Message::assistant("Hello, world"))
        );
    }
}

#[tokio::test]
async fn render_sees_one_growing_assistant_bubble() {
    let recorder = Recorder::default();
    let session = ChatSession::new(ScriptedClient::new([Reply::fragments(["a", "b", "c"])]));

    let _ = session.submit("go", &params(), &recorder.surface()).await;

    let frames = recorder.frames();
    // user message, three fragments, final idle frame
    assert_eq!(frames.len(), 5);
    assert!(frames[0].is_busy());
    assert_eq!(frames[0].messages(), &[Message::user("go")]);

    let mut expected = String::new();
    for (frame, fragment) in frames[1..4].iter().zip(["a", "b", "c"]) {
        expected.push_str(fragment);
        let assistants: Vec<&Message> = frame
            .messages()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .collect();
        assert_eq!(assistants.len(), 1);
        assert_eq!(assistants[0].content, expected);
        assert!(frame.is_busy());
    }
    assert!(!frames[4].is_busy());
}

#[tokio::test]
async fn blank_input_changes_nothing() {
    let client = ScriptedClient::new([Reply::fragments(["unused"])]);
    let recorder = Recorder::default();
    let session = ChatSession::new(client.clone());

    for input in ["", "   ", "\n\t"] {
        let outcome = session.submit(input, &params(), &recorder.surface()).await;
        assert_eq!(outcome, Submission::Ignored(IgnoreReason::EmptyInput));
    }

    assert!(session.snapshot().is_empty());
    assert!(!session.is_busy());
    assert_eq!(client.call_count(), 0);
    assert!(recorder.frames().is_empty());
}

#[tokio::test]
async fn submit_while_busy_is_ignored() {
    let client = ScriptedClient::new([
        Reply::fragments(["first reply"]),
        Reply::fragments(["second reply"]),
    ])
    .gated();
    let session = Arc::new(ChatSession::new(client.clone()));

    let in_flight = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.submit("first", &params(), &NullSurface).await }
    });
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }

    let second = session.submit("second", &params(), &NullSurface).await;
    assert_eq!(second, Submission::Ignored(IgnoreReason::Busy));
    assert_eq!(client.call_count(), 1);
    assert_eq!(session.snapshot().len(), 1);

    client.release();
    let first = in_flight.await.unwrap();
    assert_eq!(first, Submission::Completed { fragments: 1 });
    assert!(!session.is_busy());

    // the guard is released: a new turn is accepted
    client.release();
    let third = session.submit("third", &params(), &NullSurface).await;
    assert_eq!(third, Submission::Completed { fragments: 1 });
    assert_eq!(client.call_count(), 2);
    assert_eq!(
        session.snapshot().messages(),
        &[
            Message::user("first"),
            Message::assistant("first reply"),
            Message::user("third"),
            Message::assistant("second reply"),
        ]
    );
}

#[tokio::test]
async fn failure_replaces_partial_answer() {
    let session = ChatSession::new(ScriptedClient::new([Reply::fragments_then_fail(
        ["Partial ", "answer"],
        "connection reset",
    )]));

    let outcome = session.submit("explain", &params(), &NullSurface).await;
    assert_eq!(outcome, Submission::Failed);

    let conversation = session.snapshot();
    assert_eq!(conversation.len(), 2);
    assert_eq!(
        conversation.last(),
        Some(&Message::assistant("Something went wrong. Please try again."))
    );
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn refused_stream_creates_failure_reply() {
    let session = ChatSession::new(ScriptedClient::new([Reply::Refuse {
        status: 503,
        body: "overloaded".into(),
    }]));

    let outcome = session.submit("hello", &params(), &NullSurface).await;
    assert_eq!(outcome, Submission::Failed);
    assert_eq!(
        session.snapshot().messages(),
        &[
            Message::user("hello"),
            Message::assistant(DEFAULT_FAILURE_MESSAGE)
        ]
    );

    // busy is cleared after failure too
    assert!(!session.is_busy());
}

#[tokio::test]
async fn only_system_and_current_user_are_sent() {
    let client = ScriptedClient::new([Reply::fragments(["ok"])]);
    let session = ChatSession::new(client.clone()).with_conversation(Conversation::from_messages(vec![
        Message::user("one"),
        Message::assistant("two"),
        Message::user("three"),
    ]));

    let _ = session.submit("four", &params(), &NullSurface).await;

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].messages,
        vec![
            Message::system("You are a helpful assistant"),
            Message::user("four"),
        ]
    );
    assert_eq!(requests[0].parameters, params());
    assert_eq!(session.snapshot().len(), 5);
}

#[tokio::test]
async fn consecutive_turns_each_get_their_own_reply() {
    let session = ChatSession::new(ScriptedClient::new([
        Reply::fragments(["one"]),
        Reply::fragments(["two"]),
    ]));

    let _ = session.submit("a", &params(), &NullSurface).await;
    let _ = session.submit("b", &params(), &NullSurface).await;

    assert_eq!(
        session.snapshot().messages(),
        &[
            Message::user("a"),
            Message::assistant("one"),
            Message::user("b"),
            Message::assistant("two"),
        ]
    );
}

#[tokio::test]
async fn new_turn_is_accepted_after_a_failed_one() {
    for failing in [
        Reply::fragments_then_fail(["Partial "], "connection reset"),
        Reply::Refuse {
            status: 500,
            body: "boom".into(),
        },
    ] {
        let client = ScriptedClient::new([failing, Reply::fragments(["recovered"])]);
        let session = ChatSession::new(client.clone());

        let first = session.submit("first", &params(), &NullSurface).await;
        assert_eq!(first, Submission::Failed);

        let second = session.submit("second", &params(), &NullSurface).await;
        assert_eq!(second, Submission::Completed { fragments: 1 });
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.requests()[1].messages[1], Message::user("second"));
        assert_eq!(
            session.snapshot().messages(),
            &[
                Message::user("first"),
                Message::assistant(DEFAULT_FAILURE_MESSAGE),
                Message::user("second"),
                Message::assistant("recovered"),
            ]
        );
    }
}

#[tokio::test]
async fn surface_may_query_the_session() {
    let session = ChatSession::new(ScriptedClient::new([Reply::fragments(["a", "b"])]));
    let matches = Mutex::new(Vec::new());
    let surface = |c: &Conversation| matches.lock().unwrap().push(session.snapshot() == *c);

    let outcome = session.submit("go", &params(), &surface).await;

    assert_eq!(outcome, Submission::Completed { fragments: 2 });
    assert_eq!(*matches.lock().unwrap(), vec![true; 4]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ending_a_turn_never_clears_the_next_one() {
    let client = ScriptedClient::new([
        Reply::fragments(["A reply"]),
        Reply::fragments(["B reply"]),
    ])
    .gated();
    let session = Arc::new(ChatSession::new(client.clone()));
    let next_turn: Mutex<Option<tokio::task::JoinHandle<Submission>>> = Mutex::default();

    // When turn A renders its idle frame, start turn B on another worker
    // and hold A until B has reached the client.
    let surface = |c: &Conversation| {
        if c.is_busy() || c.last() != Some(&Message::assistant("A reply")) {
            return;
        }
        let mut pending = next_turn.lock().unwrap();
        if pending.is_some() {
            return;
        }
        let session_b = Arc::clone(&session);
        *pending = Some(tokio::spawn(async move {
            session_b.submit("B", &params(), &NullSurface).await
        }));
        let deadline = Instant::now() + Duration::from_secs(5);
        while client.call_count() < 2 {
            assert!(Instant::now() < deadline, "turn B never reached the client");
            std::thread::yield_now();
        }
    };

    client.release();
    let first = session.submit("A", &params(), &surface).await;
    assert_eq!(first, Submission::Completed { fragments: 1 });

    // B is still in flight after A has fully returned
    assert!(session.is_busy());
    let third = session.submit("C", &params(), &NullSurface).await;
    assert_eq!(third, Submission::Ignored(IgnoreReason::Busy));
    assert_eq!(client.call_count(), 2);

    client.release();
    let turn_b = next_turn.lock().unwrap().take().unwrap();
    assert_eq!(turn_b.await.unwrap(), Submission::Completed { fragments: 1 });
    assert!(!session.is_busy());
    assert_eq!(
        session.snapshot().messages(),
        &[
            Message::user("A"),
            Message::assistant("A reply"),
            Message::user("B"),
            Message::assistant("B reply"),
        ]
    );
}
