//! State machine that evaluates and commits transitions.

use crate::core::{
    evaluate_guards, reduce, GuardReport, GuardTable, MachineState, Reducer, StateHistory,
    TransitionIntent, TransitionRecord, TransitionTable,
};
use crate::effects::subscribers::{SubscriberRegistry, SubscriberResult};
use crate::effects::transition::{MachineError, TransitionError, TransitionOutcome};
use chrono::Utc;
use std::future::Future;
use tracing::debug;

/// Pure evaluation of a request against the current state.
struct Evaluation<C> {
    from_satisfied: bool,
    prospective: C,
    guards: GuardReport,
}

impl<C> Evaluation<C> {
    fn allowed(&self) -> bool {
        self.from_satisfied && !self.guards.has_errors()
    }
}

/// A finite state machine over context `C` and transition data `D`.
///
/// Build one with [`crate::builder::MachineBuilder`].
///
/// The machine is single-owner: [`Machine::transition`] takes `&mut self`, so
/// two transitions on the same instance can never interleave. Wrap it in a
/// mutex to share it.
pub struct Machine<C, D = ()> {
    initial: MachineState,
    current: MachineState,
    context: C,
    table: TransitionTable,
    reducer: Option<Reducer<C, D>>,
    guards: GuardTable<C, D>,
    subscribers: SubscriberRegistry<C, D>,
    history: StateHistory,
}

impl<C, D> Machine<C, D>
where
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
{
    pub(crate) fn new(
        initial: MachineState,
        context: C,
        table: TransitionTable,
        reducer: Option<Reducer<C, D>>,
        guards: GuardTable<C, D>,
    ) -> Self {
        Self {
            current: initial.clone(),
            initial,
            context,
            table,
            reducer,
            guards,
            subscribers: SubscriberRegistry::new(),
            history: StateHistory::new(),
        }
    }

    /// Get current state (pure)
    pub fn state(&self) -> &MachineState {
        &self.current
    }

    /// State the machine was built with.
    pub fn initial_state(&self) -> &MachineState {
        &self.initial
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Every declared transition name.
    pub fn transition_names(&self) -> Vec<&str> {
        self.table.names()
    }

    /// Declared transitions whose "from" check passes in the current state.
    ///
    /// Guards are not consulted since they need transition data.
    pub fn available_transitions(&self) -> Vec<&str> {
        self.table
            .names()
            .into_iter()
            .filter(|name| self.table.allows(name, &self.current))
            .collect()
    }

    /// Register an async callback to run after `event` commits.
    ///
    /// The callback receives the committed context and the transition data.
    pub fn on<F, Fut>(&mut self, event: impl Into<String>, callback: F)
    where
        F: Fn(C, D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SubscriberResult> + Send + 'static,
    {
        self.subscribers.on(event, callback);
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.subscriber_count(event)
    }

    /// Whether `name` is currently allowed with `data`.
    ///
    /// Runs the reducer and every guard for `name`. Fails only when `name` is
    /// not declared.
    pub fn can(&self, name: &str, data: &D) -> Result<bool, MachineError> {
        Ok(self.evaluate(name, data)?.allowed())
    }

    /// Request transition `name`, committing it when allowed.
    ///
    /// A rejection is returned as `Ok` with the unchanged state and context
    /// and, where applicable, an error value describing why. `Err` is
    /// reserved for undeclared transitions and failing subscribers; in the
    /// latter case the transition has already been committed.
    pub async fn transition(
        &mut self,
        name: &str,
        data: D,
    ) -> Result<TransitionOutcome<C, D>, MachineError> {
        let evaluation = self.evaluate(name, &data)?;

        if !evaluation.allowed() {
            return Ok(self.reject(name, data, evaluation));
        }

        let previous_state = self.current.clone();
        let new_state = self.table.destination(name, &previous_state);
        let state_changed = new_state != previous_state;

        self.history.push(TransitionRecord {
            name: name.to_string(),
            from: previous_state.clone(),
            to: new_state.clone(),
            timestamp: Utc::now(),
        });
        self.current = new_state.clone();
        self.context = evaluation.prospective;

        debug!(
            transition = name,
            from = %previous_state,
            to = %new_state,
            changed = state_changed,
            "transition committed"
        );

        let subscriber_results = self.subscribers.emit(name, &self.context, &data).await?;

        Ok(TransitionOutcome {
            previous_state,
            new_state,
            state_changed,
            context: self.context.clone(),
            error: None,
            subscriber_results,
        })
    }

    fn evaluate(&self, name: &str, data: &D) -> Result<Evaluation<C>, MachineError> {
        if !self.table.declares(name) {
            return Err(MachineError::UnknownTransition {
                name: name.to_string(),
            });
        }

        let from_satisfied = self.table.allows(name, &self.current);
        let prospective = reduce(
            self.reducer.as_ref(),
            &self.context,
            TransitionIntent { name, data },
        );
        let guards = evaluate_guards(name, data, &prospective, &self.guards);

        Ok(Evaluation {
            from_satisfied,
            prospective,
            guards,
        })
    }

    fn reject(&self, name: &str, data: D, evaluation: Evaluation<C>) -> TransitionOutcome<C, D> {
        let Evaluation {
            from_satisfied,
            guards,
            ..
        } = evaluation;
        let guards_failed = guards.has_errors();

        debug!(
            transition = name,
            state = %self.current,
            from_satisfied,
            guards_failed,
            "transition rejected"
        );

        let error = if guards_failed {
            Some(TransitionError::GuardsFailed {
                transition: name.to_string(),
                data,
                guards: guards.into_results(),
            })
        } else if self.table.is_composite() {
            Some(TransitionError::InvalidTransition {
                transition: name.to_string(),
                state: self.current.clone(),
            })
        } else {
            None
        };

        TransitionOutcome {
            previous_state: self.current.clone(),
            new_state: self.current.clone(),
            state_changed: false,
            context: self.context.clone(),
            error,
            subscriber_results: Vec::new(),
        }
    }
}
