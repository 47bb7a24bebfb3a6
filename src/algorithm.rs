use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Error;
use crate::facelet::CubeState;
use crate::moves::Move;

/// Shared stop flag for a running search.
///
/// The orchestrator sets it when the time budget runs out; searches poll it and bail
/// out with [Error::SearchAborted].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::SearchAborted);
        }
        Ok(())
    }
}

/// A strategy turning a valid, complete, unsolved cube state into moves that solve it.
///
/// Implementations run on a blocking worker thread.
pub trait SolvingAlgorithm: Send + Sync {
    /// Name recorded in `Solution::algorithm_used`.
    fn name(&self) -> &'static str;

    fn solve(&self, state: &CubeState, cancel: &CancelToken) -> Result<Vec<Move>, Error>;

    /// Build lookup tables ahead of the first solve.
    fn prepare(&self) {}
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let shared = token.clone();
        assert!(!shared.is_cancelled());
        assert!(shared.check().is_ok());
        token.cancel();
        assert!(shared.is_cancelled());
        assert!(matches!(shared.check(), Err(Error::SearchAborted)));
    }
}
