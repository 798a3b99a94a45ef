use crate::data::UserTicks;

/// Owner of the user tick collection and the range inputs.
///
/// Controllers read through this trait and hand back complete new values; they never
/// hold on to the collection between samples.
pub trait SelectorHost {
    fn user_ticks(&self) -> &UserTicks;

    /// Replace the collection with `transform` applied to the current one
    fn set_user_ticks(&mut self, transform: &dyn Fn(&UserTicks) -> UserTicks);

    fn set_range_min(&mut self, price: String);

    fn set_range_max(&mut self, price: String);

    fn set_user_tick_selected(&mut self, index: usize);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Host that keeps everything it is told
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub user_ticks: UserTicks,
        pub selected: Option<usize>,
        pub range_min: Vec<String>,
        pub range_max: Vec<String>,
        pub tick_updates: usize,
    }

    impl RecordingHost {
        pub fn new(user_ticks: UserTicks) -> Self {
            Self {
                user_ticks,
                ..Default::default()
            }
        }
    }

    impl SelectorHost for RecordingHost {
        fn user_ticks(&self) -> &UserTicks {
            &self.user_ticks
        }

        fn set_user_ticks(&mut self, transform: &dyn Fn(&UserTicks) -> UserTicks) {
            self.user_ticks = transform(&self.user_ticks);
            self.tick_updates += 1;
        }

        fn set_range_min(&mut self, price: String) {
            self.range_min.push(price);
        }

        fn set_range_max(&mut self, price: String) {
            self.range_max.push(price);
        }

        fn set_user_tick_selected(&mut self, index: usize) {
            self.selected = Some(index);
        }
    }
}
