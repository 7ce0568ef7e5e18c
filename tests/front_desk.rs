mod common;

use common::{seeded_store, ScriptedConsole, ScriptedDice};
use gymkeeper::config::{Config, SessionConfig};
use gymkeeper::frontdesk::{DeskExit, FrontDesk};
use gymkeeper::gym::MemberRecord;

fn quiet_config() -> Config {
    Config {
        session: SessionConfig::quiet(),
        ..Config::default()
    }
}

#[test]
fn desk_runs_guest_and_member_visits_then_exits() {
    let (store, _dir) = seeded_store();
    store
        .put_member(MemberRecord::new("jo@example.com", "Jo"))
        .unwrap();

    let inputs = [
        "1", "1", "0", // guest: beginner, leave
        "2", "jo@example.com", "2", "0", // member: intermediate, leave
        "4", // not a menu entry
        "3",
    ];
    let config = quiet_config();
    let mut desk = FrontDesk::new(&store, ScriptedConsole::new(&inputs), ScriptedDice::new(), &config);

    assert_eq!(desk.run(), DeskExit::Requested);
    assert_eq!(desk.visits(), 2);
    let console = desk.into_console();
    assert!(console.saw(&config.gym.name));
    assert!(console.saw("Welcome back"));
    assert!(console.saw("Invalid choice"));
    assert!(console.saw("Goodbye!"));
    assert!(store.get_stats("jo@example.com").unwrap().is_some());
}

#[test]
fn desk_survives_a_failed_visit() {
    let (store, _dir) = seeded_store();
    let inputs = ["2", "not an email", "2", "ghost@example.com", "3"];
    let config = quiet_config();
    let mut desk = FrontDesk::new(&store, ScriptedConsole::new(&inputs), ScriptedDice::new(), &config);

    assert_eq!(desk.run(), DeskExit::Requested);
    assert_eq!(desk.visits(), 2);
    let console = desk.into_console();
    assert!(console.saw("something went wrong"));
    assert!(console.saw("No member found"));
}

#[test]
fn desk_stops_when_input_closes() {
    let (store, _dir) = seeded_store();
    let config = quiet_config();
    let mut desk = FrontDesk::new(&store, ScriptedConsole::new(&["1"]), ScriptedDice::new(), &config);
    assert_eq!(desk.run(), DeskExit::InputClosed);
    assert_eq!(desk.visits(), 1);
}
