//! Builder that validates a whole transition table at once.
//!
//! `TransitionTable::add_transition` fails fast on the first conflict. When a
//! table is declared in one place it is more useful to see every conflict in
//! a single pass, so the builder collects entries first and validates them
//! with `Validation`, accumulating ALL ambiguities.

use crate::core::{Event, State};
use crate::table::error::ConfigurationError;
use crate::table::{Transition, TransitionTable};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Fluent builder for [`TransitionTable`].
pub struct TransitionTableBuilder<S: State, E: Event> {
    entries: Vec<Transition<S, E>>,
}

impl<S: State, E: Event> TransitionTableBuilder<S, E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare `from --event--> to`.
    pub fn transition(mut self, from: S, event: E, to: S) -> Self {
        self.entries.push(Transition::new(from, event, to));
        self
    }

    /// Declare `event --> to` from each of `froms`.
    pub fn transitions_from<I>(mut self, froms: I, event: E, to: S) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        for from in froms {
            self.entries
                .push(Transition::new(from, event.clone(), to.clone()));
        }
        self
    }

    /// Check every declared entry for ambiguity.
    /// Returns Validation::Failure with ALL conflicts if any exist.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigurationError>> {
        let mut seen: HashMap<(&S, &E), &S> = HashMap::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigurationError>>> = Vec::new();

        for entry in &self.entries {
            let check = match seen.get(&(&entry.from, &entry.event)) {
                Some(existing) if **existing != entry.to => {
                    Validation::fail(ConfigurationError::AmbiguousTransition {
                        from: entry.from.name().to_string(),
                        event: entry.event.name().to_string(),
                        existing: existing.name().to_string(),
                        requested: entry.to.name().to_string(),
                    })
                }
                Some(_) => Validation::success(()),
                None => {
                    seen.insert((&entry.from, &entry.event), &entry.to);
                    Validation::success(())
                }
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the table.
    ///
    /// A single conflict is returned as-is; several are wrapped in
    /// [`ConfigurationError::Conflicts`].
    pub fn build(self) -> Result<TransitionTable<S, E>, ConfigurationError> {
        if let Validation::Failure(errors) = self.validate() {
            let mut errors: Vec<ConfigurationError> = errors.iter().cloned().collect();
            return Err(if errors.len() == 1 {
                errors.remove(0)
            } else {
                ConfigurationError::Conflicts(errors)
            });
        }

        let mut table = TransitionTable::new();
        for entry in self.entries {
            table.add_transition(entry.from, entry.event, entry.to)?;
        }
        Ok(table)
    }
}

impl<S: State, E: Event> Default for TransitionTableBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
