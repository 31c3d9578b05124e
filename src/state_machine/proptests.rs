//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary intent sequences,
//! with responder calls completing in arbitrary order.

use super::state::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> WidgetContext {
    WidgetContext::default()
}

fn chatting() -> WidgetState {
    WidgetState {
        mode: Mode::Chatting,
        ..WidgetState::default()
    }
}

/// A responder call that has been issued but not answered
#[derive(Debug, Clone)]
struct InFlight {
    tag: RequestTag,
    text: String,
}

/// One step of a simulated visitor session
#[derive(Debug, Clone)]
enum Step {
    Intent(Event),
    /// Answer the in-flight call at `index % len`
    Complete { index: usize, reply: Reply },
    /// Fail the in-flight call at `index % len`
    Fail { index: usize },
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z]{1,12}",
        1 => "[ \t]{0,4}[a-z]{1,6}[ \t]{0,4}",
        1 => "[ \t\n]{0,5}",
    ]
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    prop_oneof![
        3 => "[a-zA-Z ]{1,20}".prop_map(Reply::Text),
        2 => Just(Reply::Unhandled),
        1 => Just(Reply::Empty),
    ]
}

fn arb_menu_entry() -> impl Strategy<Value = MenuEntry> {
    prop_oneof![
        Just(MenuEntry::Login),
        Just(MenuEntry::Register),
        Just(MenuEntry::Feedback),
    ]
}

fn arb_conversation_intent() -> impl Strategy<Value = Event> {
    prop_oneof![
        6 => arb_text().prop_map(|text| Event::SendMessage { text }),
        2 => any::<bool>().prop_map(|consent| Event::ConsentAnswered { consent }),
        2 => Just(Event::StartNewChat),
        2 => (0usize..6).prop_map(|i| Event::LoadSession { id: SessionId(i) }),
        1 => Just(Event::ShowLiveConversation),
        1 => Just(Event::RecorderAcknowledged),
    ]
}

fn arb_chrome_intent() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::ToggleHistory),
        Just(Event::CloseHistory),
        "[a-zA-Z ]{0,10}".prop_map(|name| Event::EditSessionName { name }),
        "[a-zA-Z ]{0,10}".prop_map(|text| Event::EditDraft { text }),
        Just(Event::ToggleMenu),
        arb_menu_entry().prop_map(|entry| Event::SelectMenuEntry { entry }),
        Just(Event::EnterChat),
    ]
}

fn arb_intent() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => arb_conversation_intent(),
        1 => arb_chrome_intent(),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => arb_intent().prop_map(Step::Intent),
        3 => (any::<usize>(), arb_reply()).prop_map(|(index, reply)| Step::Complete { index, reply }),
        1 => any::<usize>().prop_map(|index| Step::Fail { index }),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec(arb_step(), 0..40)
}

// ============================================================================
// Driver
// ============================================================================

/// Turn a step into an event, consuming an in-flight call if needed
fn step_to_event(step: Step, in_flight: &mut Vec<InFlight>) -> Option<Event> {
    match step {
        Step::Intent(event) => Some(event),
        Step::Complete { index, reply } => {
            if in_flight.is_empty() {
                return None;
            }
            let call = in_flight.remove(index % in_flight.len());
            Some(Event::ResponderReplied {
                tag: call.tag,
                original: call.text,
                reply,
            })
        }
        Step::Fail { index } => {
            if in_flight.is_empty() {
                return None;
            }
            let call = in_flight.remove(index % in_flight.len());
            Some(Event::ResponderFailed {
                tag: call.tag,
                message: "connection reset".to_string(),
            })
        }
    }
}

fn collect_calls(effects: &[Effect], in_flight: &mut Vec<InFlight>) {
    for effect in effects {
        if let Effect::CallResponder { tag, text } = effect {
            in_flight.push(InFlight {
                tag: *tag,
                text: text.clone(),
            });
        }
    }
}

fn is_blank_send(event: &Event) -> bool {
    matches!(event, Event::SendMessage { text } if text.trim().is_empty())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The archive only grows, by at most one session per step, and archived
    /// sessions never change afterwards
    #[test]
    fn archive_is_append_only(steps in arb_steps()) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);

            let next = result.new_state;
            prop_assert!(next.archive.len() <= state.archive.len() + 1);
            prop_assert_eq!(&next.archive[..state.archive.len()], state.archive.as_slice());
            state = next;
        }
    }

    /// Within one conversation, earlier messages are never edited or reordered
    #[test]
    fn live_messages_only_append(steps in arb_steps()) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);

            let next = result.new_state;
            if next.epoch == state.epoch {
                prop_assert!(next.live.messages.len() >= state.live.messages.len());
                prop_assert_eq!(
                    &next.live.messages[..state.live.messages.len()],
                    state.live.messages.as_slice()
                );
            } else {
                // A reset archives exactly the pre-reset transcript, if any
                prop_assert!(next.live.is_empty());
                prop_assert!(next.live.pending_consent.is_none());
                if state.live.is_empty() {
                    prop_assert_eq!(next.archive.len(), state.archive.len());
                } else {
                    prop_assert_eq!(next.archive.len(), state.archive.len() + 1);
                    prop_assert_eq!(
                        &next.archive.last().unwrap().messages,
                        &state.live.messages
                    );
                }
            }
            state = next;
        }
    }

    /// Blank sends never append and never call the responder
    #[test]
    fn blank_send_is_noop(steps in arb_steps(), blank in "[ \t\n]{0,6}") {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);
            state = result.new_state;
        }

        let event = Event::SendMessage { text: blank };
        prop_assert!(is_blank_send(&event));
        let result = transition(&state, &ctx, event).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    /// Accepted sends add one user message and exactly one responder call;
    /// text replies for the live conversation add one bot message
    #[test]
    fn message_counts_follow_round_trips(steps in arb_steps()) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let before = state.live.messages.len();

            let expected_delta = match &event {
                Event::SendMessage { text } if !text.trim().is_empty() => Some(1),
                Event::SendMessage { .. } => Some(0),
                Event::ResponderReplied { tag, reply, .. } if state.is_current(*tag) => {
                    Some(usize::from(matches!(reply, Reply::Text(_))))
                }
                Event::ResponderReplied { .. } | Event::ResponderFailed { .. } => Some(0),
                Event::ConsentAnswered { .. } if state.awaiting_consent() => Some(1),
                _ => None,
            };
            let is_send = matches!(&event, Event::SendMessage { text } if !text.trim().is_empty());

            let Ok(result) = transition(&state, &ctx, event) else { continue };
            let calls = result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::CallResponder { .. }))
                .count();
            prop_assert_eq!(calls, usize::from(is_send));
            collect_calls(&result.effects, &mut in_flight);

            if let Some(delta) = expected_delta {
                prop_assert_eq!(result.new_state.live.messages.len(), before + delta);
            }
            state = result.new_state;
        }
    }

    /// Yes records exactly once with the unhandled text; no never records
    #[test]
    fn consent_answer_records_only_on_yes(
        steps in arb_steps(),
        text in "[a-z]{1,10}",
        consent in any::<bool>(),
    ) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);
            state = result.new_state;
        }

        let sent = transition(&state, &ctx, Event::SendMessage { text: text.clone() }).unwrap();
        let tag = sent.new_state.next_seq - 1;
        let replied = transition(
            &sent.new_state,
            &ctx,
            Event::ResponderReplied {
                tag: RequestTag { epoch: sent.new_state.epoch, seq: tag },
                original: text.clone(),
                reply: Reply::Unhandled,
            },
        )
        .unwrap();
        prop_assert!(replied.new_state.awaiting_consent());

        let answered = transition(&replied.new_state, &ctx, Event::ConsentAnswered { consent }).unwrap();
        let recorded: Vec<_> = answered
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::RecordConsent { text } => Some(text.clone()),
                _ => None,
            })
            .collect();

        if consent {
            prop_assert_eq!(recorded, vec![text]);
        } else {
            prop_assert!(recorded.is_empty());
        }
        prop_assert!(!answered.new_state.awaiting_consent());
        let confirmation = answered.new_state.live.messages.last().unwrap();
        prop_assert_eq!(confirmation.origin, Origin::Bot);
    }

    /// A loaded session keeps showing exactly its messages whatever happens
    /// to the live conversation, until the selection is changed
    #[test]
    fn loaded_session_is_isolated(steps in arb_steps()) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();
        let mut pinned: Option<(SessionId, Vec<Message>)> = None;

        for step in steps {
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let selection_changes = matches!(
                event,
                Event::LoadSession { .. } | Event::ShowLiveConversation | Event::StartNewChat
            );
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);
            state = result.new_state;

            if selection_changes {
                pinned = state.selected.map(|id| (id, state.session(id).unwrap().messages.clone()));
            }

            // Selection always points into the archive
            if let Some(id) = state.selected {
                prop_assert!(id.0 < state.archive.len());
            }

            if let Some((id, messages)) = &pinned {
                prop_assert_eq!(state.selected, Some(*id));
                prop_assert_eq!(state.displayed_transcript(), messages.as_slice());
            } else {
                prop_assert_eq!(state.displayed_transcript(), state.live.messages.as_slice());
            }
        }
    }

    /// Failed responder calls leave the widget exactly as it was
    #[test]
    fn responder_failure_never_changes_state(steps in arb_steps()) {
        let ctx = test_context();
        let mut state = chatting();
        let mut in_flight = Vec::new();

        for step in steps {
            let failing = matches!(step, Step::Fail { .. });
            let Some(event) = step_to_event(step, &mut in_flight) else { continue };
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            collect_calls(&result.effects, &mut in_flight);

            if failing {
                prop_assert_eq!(&result.new_state, &state);
                let only_reports = result
                    .effects
                    .iter()
                    .all(|e| matches!(e, Effect::ReportFailure { .. }));
                prop_assert!(only_reports);
            }
            state = result.new_state;
        }
    }
}
