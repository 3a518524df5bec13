use thiserror::Error;

/// Breach of the container bookkeeping. Callers check the level before acquiring, so any of
/// these surfacing means the accounting is broken and the run must stop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Acquire of {requested} blocks exceeds the available level {level}")]
    InsufficientLevel { requested: i64, level: i64 },

    #[error("Release of {amount} blocks would raise level {level} above capacity {capacity}")]
    OverRelease { amount: i64, level: i64, capacity: i64 },

    #[error("Negative amount {0} is not a valid resource request")]
    NegativeAmount(i64),
}

/// Blocks taken out of a [`ResourceContainer`]. The only way to give them back is
/// [`ResourceContainer::release`], which consumes the grant.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a dropped grant leaks its blocks; hand it back with ResourceContainer::release"]
pub struct ResourceGrant {
    amount: i64,
}

impl ResourceGrant {
    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// Bounded pool of resource blocks of one fog node.
///
/// Invariant: `0 <= level <= capacity`.
#[derive(Debug, Clone)]
pub struct ResourceContainer {
    capacity: i64,
    level: i64,
}

impl ResourceContainer {
    /// Creates a full container.
    pub fn new(capacity: i64) -> Self {
        let capacity = capacity.max(0);
        Self { capacity, level: capacity }
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    /// Blocks currently handed out.
    pub fn allocated(&self) -> i64 {
        self.capacity - self.level
    }

    pub fn can_acquire(&self, amount: i64) -> bool {
        amount >= 0 && amount <= self.level
    }

    pub fn acquire(&mut self, amount: i64) -> Result<ResourceGrant, ResourceError> {
        if amount < 0 {
            return Err(ResourceError::NegativeAmount(amount));
        }
        if amount > self.level {
            return Err(ResourceError::InsufficientLevel { requested: amount, level: self.level });
        }

        self.level -= amount;
        Ok(ResourceGrant { amount })
    }

    pub fn release(&mut self, grant: ResourceGrant) -> Result<(), ResourceError> {
        if self.level + grant.amount > self.capacity {
            return Err(ResourceError::OverRelease { amount: grant.amount, level: self.level, capacity: self.capacity });
        }

        self.level += grant.amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release_restore_level() {
        let mut container = ResourceContainer::new(100);

        let grant = container.acquire(30).unwrap();
        assert_eq!(container.level(), 70);
        assert_eq!(container.allocated(), 30);

        container.release(grant).unwrap();
        assert_eq!(container.level(), 100);
        assert_eq!(container.allocated(), 0);
    }

    #[test]
    fn test_acquire_beyond_level_is_an_error() {
        let mut container = ResourceContainer::new(10);
        let _held = container.acquire(8).unwrap();

        let err = container.acquire(3).unwrap_err();
        assert_eq!(err, ResourceError::InsufficientLevel { requested: 3, level: 2 });
        assert_eq!(container.level(), 2, "Failed acquire must not touch the level");
    }

    #[test]
    fn test_over_release_is_an_error_not_clamped() {
        let mut container = ResourceContainer::new(10);
        let forged = ResourceGrant { amount: 5 };

        let err = container.release(forged).unwrap_err();
        assert_eq!(err, ResourceError::OverRelease { amount: 5, level: 10, capacity: 10 });
        assert_eq!(container.level(), 10);
    }

    #[test]
    fn test_negative_request_rejected() {
        let mut container = ResourceContainer::new(10);
        assert_eq!(container.acquire(-1).unwrap_err(), ResourceError::NegativeAmount(-1));
        assert!(!container.can_acquire(-1));
    }

    #[test]
    fn test_zero_capacity_container_admits_only_empty_grants() {
        let mut container = ResourceContainer::new(0);
        assert!(container.can_acquire(0));
        assert!(!container.can_acquire(1));
        let grant = container.acquire(0).unwrap();
        container.release(grant).unwrap();
    }
}
