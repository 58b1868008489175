use tracing::debug;

use crate::composer::common::argb::Size;
use crate::composer::common::error::Result;
use crate::composer::output::SizeQuery;
use crate::settings::channel_settings::Settings;
use crate::settings::store::KeyValueStore;

/// Wraps a size query and stores every accepted answer as the output size,
/// so the next query is seeded with it.
pub struct RememberedSize<'a, S: KeyValueStore, Q: SizeQuery> {
    settings: &'a mut Settings<S>,
    inner: Q,
}

impl<'a, S: KeyValueStore, Q: SizeQuery> RememberedSize<'a, S, Q> {
    pub fn new(settings: &'a mut Settings<S>, inner: Q) -> Self {
        Self { settings, inner }
    }
}

impl<S: KeyValueStore, Q: SizeQuery> SizeQuery for RememberedSize<'_, S, Q> {
    fn ask_size(&mut self, initial: Size) -> Result<Option<Size>> {
        let Some(answer) = self.inner.ask_size(initial)? else {
            return Ok(None);
        };
        debug!(size = %answer, "Remembering output size");
        self.settings.set_output_size(answer);
        Ok(Some(answer))
    }
}
