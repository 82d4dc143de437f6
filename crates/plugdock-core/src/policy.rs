pub trait UpdatePolicy {
    fn testing_channel_enabled(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy {
    pub testing_channel: bool,
}

impl UpdatePolicy for FixedPolicy {
    fn testing_channel_enabled(&self) -> bool {
        self.testing_channel
    }
}
