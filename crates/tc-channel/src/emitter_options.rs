/// Options for [`Channel::post_data`](crate::Channel::post_data)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterOptions {
    /// Also deliver to the listeners of the sending tab
    pub include_self: bool,
}

impl EmitterOptions {
    pub fn include_self() -> Self {
        Self { include_self: true }
    }
}
