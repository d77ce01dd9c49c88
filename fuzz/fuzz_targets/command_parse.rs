#![no_main]

use intake_flow::{BotCommand, ControlAction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    match BotCommand::parse(&raw) {
        Some(BotCommand::Unknown(name)) => {
            assert!(!name.is_empty());
            assert!(!name.contains('@'));
        }
        Some(_) => assert!(raw.trim_start().starts_with('/')),
        None => {}
    }

    if ControlAction::parse(&raw).is_some() {
        assert!(!raw.trim().is_empty());
        assert!(BotCommand::parse(&raw).is_none());
    }
});
