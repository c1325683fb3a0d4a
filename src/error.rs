use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Move queue is full ({capacity} commands waiting), the move was dropped.")]
    Full { capacity: usize },
}
