use std::time::Duration;

use maze_runner_core::{time_budget, Command, EndReason, Event, GridSize};
use maze_runner_session::{self as session, query, Session, SessionConfig};
use maze_runner_system_countdown::Countdown;

fn tick(dt: Duration) -> Event {
    Event::TimeAdvanced { dt }
}

#[test]
fn expires_exactly_once_when_budget_runs_out() {
    let mut countdown = Countdown::new(Duration::from_secs(2));
    let mut commands = Vec::new();

    countdown.handle(&[tick(Duration::from_millis(1_500))], &mut commands);
    assert!(commands.is_empty(), "budget not exhausted yet");

    countdown.handle(
        &[
            tick(Duration::from_millis(500)),
            tick(Duration::from_millis(500)),
        ],
        &mut commands,
    );
    assert_eq!(commands, vec![Command::Expire]);
    assert!(countdown.is_expired());
    assert!(countdown.remaining().is_zero());

    countdown.handle(&[tick(Duration::from_secs(1))], &mut commands);
    assert_eq!(commands, vec![Command::Expire], "expiry must not repeat");
}

#[test]
fn budget_reset_refills_remaining_time() {
    let mut countdown = Countdown::new(Duration::from_secs(5));
    let mut commands = Vec::new();

    countdown.handle(&[tick(Duration::from_secs(4))], &mut commands);
    countdown.handle(
        &[Event::BudgetReset {
            budget: Duration::from_secs(5),
        }],
        &mut commands,
    );
    countdown.handle(&[tick(Duration::from_secs(4))], &mut commands);

    assert!(commands.is_empty());
    assert_eq!(countdown.remaining(), Duration::from_secs(1));
}

#[test]
fn ended_session_stops_the_clock() {
    let mut countdown = Countdown::new(Duration::from_secs(1));
    let mut commands = Vec::new();

    countdown.handle(
        &[
            Event::SessionEnded {
                final_score: 2,
                final_level: 1,
                reason: EndReason::IllegalMove,
            },
            tick(Duration::from_secs(3)),
        ],
        &mut commands,
    );

    assert!(commands.is_empty());
    assert!(countdown.is_expired());
}

#[test]
fn drives_a_session_to_timeout() {
    let size = GridSize::new(10).expect("valid grid size");
    let mut session = Session::new(SessionConfig::new(size, 8));
    let mut countdown = Countdown::new(query::time_budget(&session));
    assert_eq!(countdown.budget(), time_budget(size));

    let mut ticks = 0;
    while !query::is_over(&session) {
        ticks += 1;
        assert!(ticks <= 1_000, "session never timed out");

        let mut events = Vec::new();
        session::apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        countdown.handle(&events, &mut commands);

        let mut follow_up = Vec::new();
        for command in commands {
            session::apply(&mut session, command, &mut follow_up);
        }
        countdown.handle(&follow_up, &mut Vec::new());
    }

    assert_eq!(ticks, 17 * 20, "17 second budget at 50ms per tick");
    assert_eq!(query::end_reason(&session), Some(EndReason::TimedOut));
}
