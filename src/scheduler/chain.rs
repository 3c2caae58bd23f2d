/*!
 * Policy Chain
 * Ordered scheduling classes, highest first
 */

use super::idle::IdleClass;
use super::rq::Rq;
use super::traits::SchedClass;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::types::{Policy, TaskId};
use crate::process::TaskTable;
use crate::ras::RasScheduler;
use std::sync::Arc;

/// Classes consulted in order when picking the next task
///
/// A class is only asked for a task after every class above it came back
/// empty.
#[derive(Default, Clone)]
pub struct PolicyChain {
    classes: Vec<Arc<dyn SchedClass>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// RAS directly above idle
    pub fn standard(ras: Arc<RasScheduler>) -> Self {
        let mut chain = Self::new();
        chain.register(ras);
        chain.register(Arc::new(IdleClass));
        chain
    }

    /// Append a class below all registered ones
    ///
    /// Registering a policy twice replaces the earlier class in place.
    pub fn register(&mut self, class: Arc<dyn SchedClass>) {
        let policy = class.policy();
        match self.classes.iter().position(|c| c.policy() == policy) {
            Some(slot) => self.classes[slot] = class,
            None => self.classes.push(class),
        }
    }

    pub fn class_for(&self, policy: Policy) -> SchedResult<Arc<dyn SchedClass>> {
        self.classes
            .iter()
            .find(|class| class.policy() == policy)
            .cloned()
            .ok_or(SchedulerError::PolicyNotRegistered(policy))
    }

    /// Position in the chain; lower ranks are consulted first
    pub fn rank(&self, policy: Policy) -> Option<usize> {
        self.classes.iter().position(|class| class.policy() == policy)
    }

    pub fn policies(&self) -> impl Iterator<Item = Policy> + '_ {
        self.classes.iter().map(|class| class.policy())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// First task offered by any class, walking down the chain
    pub fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId> {
        self.classes
            .iter()
            .find_map(|class| class.pick_next_task(rq, tasks))
    }
}

impl std::fmt::Debug for PolicyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.classes.iter().map(|class| class.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let chain = PolicyChain::standard(Arc::new(RasScheduler::default()));
        assert_eq!(
            chain.policies().collect::<Vec<_>>(),
            vec![Policy::Ras, Policy::Idle]
        );
        assert_eq!(chain.rank(Policy::Ras), Some(0));
        assert_eq!(chain.rank(Policy::Idle), Some(1));
    }

    #[test]
    fn test_register_replaces_same_policy() {
        let mut chain = PolicyChain::standard(Arc::new(RasScheduler::default()));
        chain.register(Arc::new(IdleClass));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_missing_policy() {
        let mut chain = PolicyChain::new();
        chain.register(Arc::new(IdleClass));
        assert!(matches!(
            chain.class_for(Policy::Ras),
            Err(SchedulerError::PolicyNotRegistered(Policy::Ras))
        ));
        assert_eq!(chain.rank(Policy::Ras), None);
    }
}
