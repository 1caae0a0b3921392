//! Capture/republish cycle against the in-memory clipboard subsystem.
//!
//! These tests check the observable clipboard state after a cycle, the
//! open/close balance of the guard and the ownership of every block.

use ck_app::{
    CaptureAndRepublish, CaptureError, CycleError, CycleOutcome, GuardError, ResourceGuard,
    SkipReason,
};
use ck_core::clipboard::DecodeError;
use ck_core::ports::ClipboardError;
use ck_core::RetryPolicy;
use ck_platform::adapters::{InMemoryClipboard, InMemoryClipboardSystem, InMemorySharedMemory};

fn cycle_for(
    system: &InMemoryClipboardSystem,
    max_attempts: u32,
) -> CaptureAndRepublish<InMemoryClipboard, InMemorySharedMemory> {
    let guard = ResourceGuard::new(system.clipboard(), RetryPolicy::immediate(max_attempts));
    CaptureAndRepublish::new(guard, system.memory())
}

fn assert_balanced(system: &InMemoryClipboardSystem) {
    let counters = system.counters();
    assert_eq!(counters.opens, counters.closes, "guard left clipboard open");
    assert!(!system.is_open());
    assert_eq!(counters.invalid_frees, 0, "freed a block the process did not own");
    assert_eq!(system.process_owned_blocks(), 0, "leaked a block");
}

#[test]
fn republishes_external_text_into_own_block() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("hello world");
    let before = system.text_bytes().unwrap();

    let outcome = cycle_for(&system, 3).execute().unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Republished {
            utf16_units: 11,
            attempts: 1
        }
    );
    assert_eq!(system.text().as_deref(), Some("hello world"));

    // Exactly sized: the allocator padding of the source block is dropped.
    let after = system.text_bytes().unwrap();
    assert_eq!(after.len(), 24);
    assert!(before.len() > after.len());
    assert_eq!(&after[..], &before[..24]);

    let counters = system.counters();
    assert_eq!(counters.empties, 1);
    assert_eq!(counters.sets, 1);
    assert_eq!(counters.allocations, 1);
    assert_balanced(&system);
}

#[test]
fn preserves_unicode_outside_the_basic_plane() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("naïve 😀 テキスト");

    let outcome = cycle_for(&system, 1).execute().unwrap();

    assert!(matches!(outcome, CycleOutcome::Republished { .. }));
    assert_eq!(system.text().as_deref(), Some("naïve 😀 テキスト"));
    assert_balanced(&system);
}

#[test]
fn empty_text_is_republished_as_empty_text() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("");

    let outcome = cycle_for(&system, 1).execute().unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Republished {
            utf16_units: 0,
            attempts: 1
        }
    );
    assert_eq!(system.text().as_deref(), Some(""));
    assert_eq!(system.text_bytes().unwrap(), vec![0, 0]);
    assert_balanced(&system);
}

#[test]
fn text_is_read_up_to_the_first_terminator() {
    let system = InMemoryClipboardSystem::new();
    // "ab", terminator, then garbage the producer left behind.
    system.copy_external_bytes(vec![0x61, 0, 0x62, 0, 0, 0, 0x63, 0, 0x64, 0]);

    cycle_for(&system, 1).execute().unwrap();

    assert_eq!(system.text().as_deref(), Some("ab"));
    assert_eq!(system.text_bytes().unwrap().len(), 6);
    assert_balanced(&system);
}

#[test]
fn undecodable_text_is_skipped_before_emptying() {
    let system = InMemoryClipboardSystem::new();
    // Lone high surrogate followed by 'a'.
    system.copy_external_bytes(vec![0x00, 0xD8, 0x61, 0, 0, 0]);
    let before = system.text_bytes();

    let outcome = cycle_for(&system, 1).execute().unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Skipped(SkipReason::Capture(CaptureError::Decode(
            DecodeError::InvalidUtf16
        )))
    );
    assert_eq!(system.counters().empties, 0);
    assert_eq!(system.counters().allocations, 0);
    assert_eq!(system.text_bytes(), before);
    assert_balanced(&system);
}

#[test]
fn non_text_clipboard_is_left_alone() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external_non_text();

    let outcome = cycle_for(&system, 1).execute().unwrap();

    assert_eq!(outcome, CycleOutcome::NoData);
    assert_eq!(system.text(), None);
    let counters = system.counters();
    assert_eq!(counters.empties, 0);
    assert_eq!(counters.allocations, 0);
    assert_balanced(&system);
}

#[test]
fn waits_out_a_competing_holder() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("contended");
    system.hold_by_other(3);

    let outcome = cycle_for(&system, 5).execute().unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Republished {
            utf16_units: 9,
            attempts: 4
        }
    );
    assert_eq!(system.counters().open_attempts, 4);
    assert_eq!(system.text().as_deref(), Some("contended"));
    assert_balanced(&system);
}

#[test]
fn gives_up_without_touching_content_when_contention_persists() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("kept");
    system.hold_by_other(10);

    let outcome = cycle_for(&system, 3).execute().unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Skipped(SkipReason::Contention(GuardError::Exhausted { attempts: 3 }))
    );
    assert_eq!(system.counters().open_attempts, 3);
    assert_eq!(system.counters().opens, 0);
    assert_eq!(system.text().as_deref(), Some("kept"));
    assert_balanced(&system);
}

#[test]
fn rejected_publish_frees_block_exactly_once_and_is_fatal() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("lost");
    system.fail_next_set(ClipboardError::SetFailed(5));

    let err = cycle_for(&system, 1).execute().unwrap_err();

    assert!(matches!(
        err,
        CycleError::PublishFailed(ClipboardError::SetFailed(5))
    ));
    let counters = system.counters();
    assert_eq!(counters.allocations, 1);
    assert_eq!(counters.process_frees, 1);
    assert_eq!(system.text(), None);
    assert_balanced(&system);
}

#[test]
fn failed_allocation_is_fatal_and_leaves_clipboard_closed() {
    let system = InMemoryClipboardSystem::new();
    system.copy_external("lost");
    system.fail_next_allocation();

    let err = cycle_for(&system, 1).execute().unwrap_err();

    assert!(matches!(err, CycleError::AllocationFailed(_)));
    assert_eq!(system.counters().sets, 0);
    assert_balanced(&system);
}

#[test]
fn consecutive_cycles_release_previous_blocks() {
    let system = InMemoryClipboardSystem::new();
    let mut cycle = cycle_for(&system, 1);

    for text in ["one", "two", "three"] {
        system.copy_external(text);
        cycle.execute().unwrap();
        assert_eq!(system.text().as_deref(), Some(text));
    }

    let counters = system.counters();
    assert_eq!(counters.opens, 3);
    assert_eq!(counters.allocations, 3);
    assert_balanced(&system);
}
