use serde::{Deserialize, Serialize};

use crate::{
    Clip, ClickModifiers, ClipId, ClipPatch, DragMode, Key, KeyCommand, KeyInput, MarqueeOutcome,
    Seconds, TimelineEngine, TimelineError,
};

/// A clip named either by id or by its position in the committed order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ClipRef {
    Id(ClipId),
    Index(usize),
}

impl ClipRef {
    pub fn resolve(self, engine: &TimelineEngine) -> Result<ClipId, TimelineError> {
        match self {
            Self::Id(id) if engine.clip(&id).is_some() => Ok(id),
            Self::Id(id) => Err(TimelineError::ClipNotFound(id)),
            Self::Index(index) => engine
                .clips()
                .get(index)
                .map(|clip| clip.id)
                .ok_or(TimelineError::ClipIndexOutOfRange(index)),
        }
    }
}

/// Serialized form of one input event, as recorded in replay scripts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TimelineCommand {
    AddClips {
        clips: Vec<Clip>,
    },
    RemoveClips {
        clips: Vec<ClipRef>,
    },
    UpdateClip {
        clip: ClipRef,
        patch: ClipPatch,
    },
    SetPlayhead {
        time: Seconds,
    },
    SetDuration {
        duration: Seconds,
    },
    SetZoom {
        pixels_per_second: f64,
    },
    SetLyrics {
        times: Vec<Seconds>,
    },
    Click {
        clip: ClipRef,
        #[serde(default)]
        toggle: bool,
        #[serde(default)]
        range: bool,
    },
    PointerDown {
        clip: ClipRef,
        mode: DragMode,
        x: f64,
    },
    PointerMove {
        x: f64,
    },
    PointerUp,
    MarqueeDown {
        x: f64,
        y: f64,
    },
    MarqueeMove {
        x: f64,
        y: f64,
    },
    MarqueeUp {
        x: f64,
        y: f64,
    },
    Key {
        key: Key,
        /// Cmd on macOS, Ctrl elsewhere.
        #[serde(default)]
        modifier: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        text_focus: bool,
    },
    Cancel,
    ResetHistory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Unchanged,
    Created { ids: Vec<ClipId> },
    Seeked { time: Seconds },
    Selected { count: usize },
}

impl CommandOutcome {
    fn from_flag(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }
}

/// Applies one command. The engine itself ignores bad input; this layer
/// reports it, so a replay script fails loudly on a stale clip reference or
/// an out-of-order gesture.
pub fn apply_command(
    engine: &mut TimelineEngine,
    command: TimelineCommand,
) -> Result<CommandOutcome, TimelineError> {
    let outcome = match command {
        TimelineCommand::AddClips { clips } => CommandOutcome::Created {
            ids: engine.add_clips(clips),
        },
        TimelineCommand::RemoveClips { clips } => {
            let ids = clips
                .into_iter()
                .map(|clip| clip.resolve(engine))
                .collect::<Result<Vec<_>, _>>()?;
            CommandOutcome::from_flag(engine.remove_clips(&ids) > 0)
        }
        TimelineCommand::UpdateClip { clip, patch } => {
            let id = clip.resolve(engine)?;
            CommandOutcome::from_flag(engine.update_clip(&id, &patch))
        }
        TimelineCommand::SetPlayhead { time } => {
            engine.set_playhead(time);
            CommandOutcome::Applied
        }
        TimelineCommand::SetDuration { duration } => {
            engine.set_total_duration(duration);
            CommandOutcome::Applied
        }
        TimelineCommand::SetZoom { pixels_per_second } => {
            engine.set_pixels_per_second(pixels_per_second);
            CommandOutcome::Applied
        }
        TimelineCommand::SetLyrics { times } => {
            engine.set_lyric_anchors(times);
            CommandOutcome::Applied
        }
        TimelineCommand::Click {
            clip,
            toggle,
            range,
        } => {
            let id = clip.resolve(engine)?;
            engine.click_clip(id, ClickModifiers { toggle, range });
            CommandOutcome::Selected {
                count: engine.selection().count(),
            }
        }
        TimelineCommand::PointerDown { clip, mode, x } => {
            if engine.drag_session().is_some() {
                return Err(TimelineError::GestureInProgress);
            }
            let id = clip.resolve(engine)?;
            CommandOutcome::from_flag(engine.pointer_down(id, mode, x))
        }
        TimelineCommand::PointerMove { x } => {
            if engine.drag_session().is_none() {
                return Err(TimelineError::NoActiveGesture);
            }
            CommandOutcome::from_flag(engine.pointer_move(x).is_some())
        }
        TimelineCommand::PointerUp => {
            if !engine.pointer_up() {
                return Err(TimelineError::NoActiveGesture);
            }
            CommandOutcome::Applied
        }
        TimelineCommand::MarqueeDown { x, y } => {
            engine.begin_marquee(x, y);
            CommandOutcome::Applied
        }
        TimelineCommand::MarqueeMove { x, y } => {
            if engine.marquee().is_none() {
                return Err(TimelineError::NoActiveMarquee);
            }
            match engine.update_marquee(x, y) {
                Some(count) => CommandOutcome::Selected { count },
                None => CommandOutcome::Unchanged,
            }
        }
        TimelineCommand::MarqueeUp { x, y } => {
            if engine.marquee().is_none() {
                return Err(TimelineError::NoActiveMarquee);
            }
            match engine.end_marquee(x, y) {
                Some(MarqueeOutcome::Selected(count)) => CommandOutcome::Selected { count },
                Some(MarqueeOutcome::Seeked(time)) => CommandOutcome::Seeked { time },
                None => CommandOutcome::Unchanged,
            }
        }
        TimelineCommand::Key {
            key,
            modifier,
            shift,
            text_focus,
        } => {
            let input = KeyInput {
                key: Some(key),
                command: modifier,
                shift,
            };
            match KeyCommand::from_input(input) {
                Some(KeyCommand::Paste) if !text_focus => {
                    let ids = engine.paste();
                    if ids.is_empty() {
                        CommandOutcome::Unchanged
                    } else {
                        CommandOutcome::Created { ids }
                    }
                }
                Some(action) => CommandOutcome::from_flag(engine.handle_key(action, text_focus)),
                None => CommandOutcome::Unchanged,
            }
        }
        TimelineCommand::Cancel => {
            engine.cancel_interaction();
            CommandOutcome::Applied
        }
        TimelineCommand::ResetHistory => {
            engine.reset_history();
            CommandOutcome::Applied
        }
    };

    tracing::trace!(?outcome, "command applied");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> TimelineCommand {
        serde_json::from_value(value).unwrap()
    }

    fn seeded() -> TimelineEngine {
        let mut engine = TimelineEngine::default();
        let add = parse(json!({
            "command": "add_clips",
            "clips": [
                {"media_kind": "video", "source": "b.mp4", "start": 4.0, "end": 6.0},
                {"media_kind": "audio", "source": "a.wav", "start": 0.0, "end": 2.0}
            ]
        }));
        apply_command(&mut engine, add).unwrap();
        engine
    }

    #[test]
    fn index_refs_follow_committed_order() {
        let mut engine = seeded();
        let outcome = apply_command(
            &mut engine,
            parse(json!({"command": "click", "clip": 0})),
        )
        .unwrap();
        assert_eq!(outcome, CommandOutcome::Selected { count: 1 });
        assert_eq!(engine.selected_ids(), vec![engine.clips()[0].id]);
        assert_eq!(engine.clips()[0].source.0, "a.wav");
    }

    #[test]
    fn unknown_clip_is_an_error() {
        let mut engine = seeded();
        let err = apply_command(&mut engine, parse(json!({"command": "click", "clip": 7})));
        assert!(matches!(err, Err(TimelineError::ClipIndexOutOfRange(7))));

        let stray = ClipId::new();
        let err = apply_command(
            &mut engine,
            TimelineCommand::RemoveClips {
                clips: vec![ClipRef::Id(stray)],
            },
        );
        assert!(matches!(err, Err(TimelineError::ClipNotFound(id)) if id == stray));
        assert_eq!(engine.clips().len(), 2);
    }

    #[test]
    fn gesture_misuse_is_reported() {
        let mut engine = seeded();
        assert!(matches!(
            apply_command(&mut engine, parse(json!({"command": "pointer_up"}))),
            Err(TimelineError::NoActiveGesture)
        ));
        apply_command(
            &mut engine,
            parse(json!({"command": "pointer_down", "clip": 1, "mode": "move", "x": 200.0})),
        )
        .unwrap();
        assert!(matches!(
            apply_command(
                &mut engine,
                parse(json!({"command": "pointer_down", "clip": 0, "mode": "resize_end", "x": 0.0}))
            ),
            Err(TimelineError::GestureInProgress)
        ));
        assert!(matches!(
            apply_command(&mut engine, parse(json!({"command": "marquee_move", "x": 1.0, "y": 1.0}))),
            Err(TimelineError::NoActiveMarquee)
        ));
    }

    #[test]
    fn copy_paste_through_keys() {
        let mut engine = seeded();
        apply_command(&mut engine, parse(json!({"command": "click", "clip": 1}))).unwrap();
        let copy = parse(json!({"command": "key", "key": "c"}));
        assert_eq!(
            apply_command(&mut engine, copy).unwrap(),
            CommandOutcome::Unchanged
        );
        let copy = parse(json!({"command": "key", "key": "c", "modifier": true}));
        assert_eq!(
            apply_command(&mut engine, copy).unwrap(),
            CommandOutcome::Applied
        );
        apply_command(&mut engine, parse(json!({"command": "set_playhead", "time": 10.0})))
            .unwrap();
        let outcome = apply_command(
            &mut engine,
            TimelineCommand::Key {
                key: Key::V,
                modifier: true,
                shift: false,
                text_focus: false,
            },
        )
        .unwrap();
        let ids = match outcome {
            CommandOutcome::Created { ids } => ids,
            other => panic!("paste should create clips, got {other:?}"),
        };
        assert_eq!(ids.len(), 1);
        let pasted = engine.clip(&ids[0]).unwrap();
        assert_eq!((pasted.start, pasted.end), (10.0, 12.0));
        assert_eq!(engine.selected_ids(), ids);
    }

    #[test]
    fn text_focus_blocks_paste() {
        let mut engine = seeded();
        engine.select_all();
        engine.copy();
        let outcome = apply_command(
            &mut engine,
            TimelineCommand::Key {
                key: Key::V,
                modifier: true,
                shift: false,
                text_focus: true,
            },
        )
        .unwrap();
        assert_eq!(outcome, CommandOutcome::Unchanged);
        assert_eq!(engine.clips().len(), 2);
    }

    #[test]
    fn unit_commands_parse_without_fields() {
        assert_eq!(parse(json!({"command": "cancel"})), TimelineCommand::Cancel);
        assert_eq!(
            parse(json!({"command": "reset_history"})),
            TimelineCommand::ResetHistory
        );
    }
}
