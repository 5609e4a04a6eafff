use futures::StreamExt;
use roulette::domain::Phase;
use roulette::{ChannelError, Record, RecordPath, SharedStateChannel};

use crate::support::session::TestSession;

#[tokio::test]
async fn subscribers_see_each_committed_session_state() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    let path = RecordPath::Session(owner.session_id().clone());
    let mut sub = s.channel.subscribe(&path);
    assert_eq!(sub.version(), 1);

    s.flow.start_run(&owner).await.unwrap();
    let feed = sub.changed().await.unwrap();

    let Some(Record::Session(state)) = feed.record else {
        panic!("expected a session record at {path}");
    };
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(feed.version, 2);
}

#[tokio::test]
async fn stream_delivers_current_snapshot_first() {
    let s = TestSession::new(1).await;
    let owner = s.owner();
    let path = RecordPath::Stats(owner.session_id().clone());

    let mut stream = s.channel.subscribe(&path).into_stream();
    let first = stream.next().await.unwrap();

    assert!(matches!(first.record, Some(Record::Stats(_))));
    assert!(first.error.is_none());
}

#[tokio::test]
async fn read_errors_fill_the_slot_without_losing_the_snapshot() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    let me = RecordPath::Participant(owner.session_id().clone(), s.ids()[0].clone());

    s.channel
        .push_read_error(&me, ChannelError::Unavailable("listener lagged".into()));

    let errors = owner.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, me);
    assert!(owner.me().is_ok());

    // next good write clears the slot
    s.flow.start_run(&owner).await.unwrap();
    assert!(owner.errors().is_empty());
}

#[tokio::test]
async fn leaving_drops_subscriptions() {
    let s = TestSession::new(1).await;
    let ctx = s.member(0);
    ctx.leave();

    // session keeps working for everyone else
    let owner = s.owner();
    s.flow.start_run(&owner).await.unwrap();
    assert_eq!(owner.phase(), Some(Phase::Rolling));
}
