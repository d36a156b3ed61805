use crate::{Effect, Msg, Outcome, Phase, RouteDecision, RunState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current phase are ignored.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match (state.phase, msg) {
        (Phase::Loading, Msg::Loaded { units, progress }) => {
            state.units = units;
            state.progress = progress;
            state.cursor = 0;
            state.phase = Phase::Iterating;
            step(&mut state)
        }
        (Phase::Skipped, Msg::SkipLogged) => advance(&mut state),
        (Phase::Fetching, Msg::FetchFinished(result)) => match state.current_unit() {
            Some(unit) => {
                let unit = unit.clone();
                state.phase = Phase::Routing;
                vec![Effect::Route { unit, result }]
            }
            None => finish(&mut state, false),
        },
        (Phase::Routing, Msg::Routed(decision)) => record(&mut state, decision),
        (Phase::Recording, Msg::Recorded) => {
            if let Some(outcome) = state.current_outcome.take() {
                state.stats.record(outcome);
            }
            if let Some(unit) = state.current_unit() {
                let key = unit.key();
                state.progress.mark_done(key);
            }
            vec![Effect::PersistProgress]
        }
        (Phase::Recording, Msg::ProgressPersisted) => {
            if state.current_fetched && !state.stop_requested {
                state.phase = Phase::Pacing;
                vec![Effect::Pace]
            } else {
                advance(&mut state)
            }
        }
        (Phase::Pacing, Msg::Paced) => advance(&mut state),
        (phase, Msg::StopRequested) => match phase {
            // Current unit is either untouched or fully committed.
            Phase::Loading | Phase::Iterating | Phase::Fetching => {
                state.stop_requested = true;
                let interrupted = state.cursor < state.units.len();
                finish(&mut state, interrupted)
            }
            Phase::Pacing => {
                state.stop_requested = true;
                let interrupted = state.cursor + 1 < state.units.len();
                finish(&mut state, interrupted)
            }
            // Honored at the next step, after the ledger flush.
            Phase::Skipped | Phase::Routing | Phase::Recording => {
                state.stop_requested = true;
                Vec::new()
            }
            Phase::Done => Vec::new(),
        },
        _ => Vec::new(),
    };

    (state, effects)
}

fn record(state: &mut RunState, decision: RouteDecision) -> Vec<Effect> {
    state.current_outcome = Some(Outcome::from(&decision));
    state.phase = Phase::Recording;
    vec![Effect::Record { decision }]
}

fn advance(state: &mut RunState) -> Vec<Effect> {
    state.cursor += 1;
    state.phase = Phase::Iterating;
    step(state)
}

fn step(state: &mut RunState) -> Vec<Effect> {
    state.current_outcome = None;
    state.current_fetched = false;

    if state.cursor >= state.units.len() {
        return finish(state, false);
    }
    if state.stop_requested {
        return finish(state, true);
    }

    let mut effects = Vec::with_capacity(2);
    if state.cursor % state.batch_size == 0 {
        let remaining = state.units.len() - state.cursor;
        effects.push(Effect::StartBatch {
            number: state.cursor / state.batch_size + 1,
            first_index: state.cursor,
            len: remaining.min(state.batch_size),
        });
    }

    let unit = state.units[state.cursor].clone();
    if state.progress.is_done(&unit.key()) {
        state.phase = Phase::Skipped;
        state.stats.skipped += 1;
        effects.push(Effect::LogSkip { unit });
    } else if !unit.is_queryable() {
        effects.extend(record(state, RouteDecision::invalid_unit(&unit)));
    } else {
        state.phase = Phase::Fetching;
        state.current_fetched = true;
        effects.push(Effect::Fetch { unit });
    }
    effects
}

fn finish(state: &mut RunState, interrupted: bool) -> Vec<Effect> {
    state.interrupted = interrupted;
    state.phase = Phase::Done;
    vec![Effect::Finish(state.summary())]
}
