use crate::exits::{lookup_exit, Exit};
use crate::test_utils::{interpreter, GameImageBuilder};
use crate::vm::{Game, VM};
use test_log::test;

fn exit(flags: u8, target: u8) -> Exit {
    Exit { flags, target }
}

fn vm(b: &GameImageBuilder) -> VM {
    VM::new(Game::from_memory(b.build()).unwrap())
}

#[test]
fn single_one_way_exit() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(2, 0, 5)]);
    let vm = vm(&b);
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 1, 2), exit(0, 5));
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 1, 3), Exit::default());
}

#[test]
fn later_locations_skip_earlier_lists() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(1, 0, 2), (2, 3, 4)])
        .location_exits(&[(2, 2, 7)])
        .location_exits(&[(5, 0, 1), (6, 0, 2)]);
    let vm = vm(&b);
    let map = vm.exit_map();
    assert_eq!(lookup_exit(&vm.memory, map, 1, 2), exit(3, 4));
    assert_eq!(lookup_exit(&vm.memory, map, 2, 2), exit(2, 7));
    assert_eq!(lookup_exit(&vm.memory, map, 3, 6), exit(0, 2));
}

#[test]
fn bidirectional_exit_is_found_backwards() {
    let mut b = GameImageBuilder::new();
    // location 1: direction 1 to location 2, marked as reversible
    b.location_exits(&[(1, 1, 2)]).location_exits(&[(3, 0, 9)]);
    let vm = vm(&b);
    let map = vm.exit_map();
    // direction 4 reverses to direction 1
    assert_eq!(lookup_exit(&vm.memory, map, 2, 4), exit(1, 1));
    // another direction has no reverse link
    assert_eq!(lookup_exit(&vm.memory, map, 2, 5), Exit::default());
}

#[test]
fn one_way_exit_is_not_reversed() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(1, 0, 2)]).location_exits(&[(3, 0, 9)]);
    let vm = vm(&b);
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 2, 4), Exit::default());
}

#[test]
fn high_directions_have_no_reverse() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(13, 1, 2)]).location_exits(&[(3, 0, 9)]);
    let vm = vm(&b);
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 2, 13), Exit::default());
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 2, 14), Exit::default());
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 1, 13), exit(1, 2));
}

#[test]
fn location_zero_has_no_exits() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(0, 0, 3)]);
    let vm = vm(&b);
    assert_eq!(lookup_exit(&vm.memory, vm.exit_map(), 0, 7), Exit::default());
}

#[test]
fn exit_opcode_writes_flags_then_target() {
    let mut b = GameImageBuilder::new();
    b.location_exits(&[(2, 0, 5)]);
    b.code(&[
        0x48, 0x01, 0x01, // V1 = 1 (location)
        0x48, 0x02, 0x02, // V2 = 2 (direction)
        0x48, 0x09, 0x03, // V3 = 9
        0x0F, 0x01, 0x02, 0x03, 0x04, // V3, V4 = exit
        0x06, 0x01,
    ]);
    let (mut interp, _) = interpreter(&b, &[]);
    interp.execute(None).unwrap();
    assert_eq!(interp.vm.read_variable(3), 0);
    assert_eq!(interp.vm.read_variable(4), 5);
}
