//! The redirector context
//!
//! One [`Redirector`] is built at process attach and handed to the hooked
//! entry points. It owns the options, the document cache and the optional
//! native API used for passthrough writes.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::RedirectorCache;
use crate::hook::{HookInstaller, HookTarget, NativeProfileApi};
use crate::options::RedirectorOptions;
use crate::persistence::{FlushReport, ProfileStore};

/// Shared state behind every redirected call.
pub struct Redirector {
    options: RedirectorOptions,
    cache: RedirectorCache,
    native: Option<Arc<dyn NativeProfileApi>>,
}

impl std::fmt::Debug for Redirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redirector")
            .field("options", &self.options)
            .field("cache", &self.cache)
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl Redirector {
    /// Create a redirector that loads and saves documents through `store`.
    pub fn new(options: RedirectorOptions, store: Arc<dyn ProfileStore>) -> Self {
        info!(
            "{} {} starting with {:?}",
            crate::LIBRARY_NAME,
            crate::VERSION,
            options
        );
        Self {
            options,
            cache: RedirectorCache::new(store, options.save_on_write),
            native: None,
        }
    }

    /// Attach the real OS API for native-write passthrough.
    #[must_use]
    pub fn with_native(mut self, native: Arc<dyn NativeProfileApi>) -> Self {
        self.native = Some(native);
        self
    }

    /// Options in effect.
    pub const fn options(&self) -> &RedirectorOptions {
        &self.options
    }

    /// The document cache.
    pub const fn cache(&self) -> &RedirectorCache {
        &self.cache
    }

    /// The native API, if one was attached.
    pub fn native(&self) -> Option<&dyn NativeProfileApi> {
        self.native.as_deref()
    }

    /// Save every dirty document.
    pub fn flush_all(&self, message: &str) -> FlushReport {
        self.cache.flush_all(message)
    }

    /// Called whenever a host thread exits.
    ///
    /// Flushes only when `save_on_thread_detach` is enabled.
    pub fn on_thread_detach(&self) -> Option<FlushReport> {
        self.options
            .save_on_thread_detach
            .then(|| self.flush_all("On thread detach"))
    }

    /// Route every profile function into the redirector.
    ///
    /// Returns the number of targets attached successfully. Failures are
    /// logged; the remaining targets are still attempted.
    pub fn install_hooks(&self, hooks: &mut dyn HookInstaller) -> usize {
        if self.options.native_write && self.native.is_none() {
            warn!("Native write is enabled but no native API is attached, writes stay in memory");
        }

        let mut attached = 0;
        for target in HookTarget::ALL {
            let status = hooks.attach(target);
            if status.is_ok() {
                info!("Attached '{target}'");
                attached += 1;
            } else {
                warn!("Failed to attach '{target}', status: {status}");
            }
        }
        attached
    }

    /// Restore the system profile functions, in reverse order.
    pub fn uninstall_hooks(&self, hooks: &mut dyn HookInstaller) -> usize {
        let mut detached = 0;
        for target in HookTarget::ALL.into_iter().rev() {
            let status = hooks.detach(target);
            if status.is_ok() {
                info!("Detached '{target}'");
                detached += 1;
            } else {
                warn!("Failed to detach '{target}', status: {status}");
            }
        }
        detached
    }

    /// Process detach: remove the hooks, then save every dirty document.
    pub fn shutdown(&self, hooks: &mut dyn HookInstaller) -> FlushReport {
        self.uninstall_hooks(hooks);
        self.flush_all("On process detach")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::HookStatus;
    use crate::persistence::FileStore;

    #[derive(Default)]
    struct Installer {
        log: Vec<(bool, HookTarget)>,
    }

    impl HookInstaller for Installer {
        fn attach(&mut self, target: HookTarget) -> HookStatus {
            self.log.push((true, target));
            if target == HookTarget::GetIntW {
                HookStatus(5)
            } else {
                HookStatus::OK
            }
        }

        fn detach(&mut self, target: HookTarget) -> HookStatus {
            self.log.push((false, target));
            HookStatus::OK
        }
    }

    #[test]
    fn test_install_and_uninstall_order() {
        let redirector = Redirector::new(RedirectorOptions::default(), Arc::new(FileStore));
        let mut hooks = Installer::default();

        assert_eq!(redirector.install_hooks(&mut hooks), 9);
        assert_eq!(redirector.uninstall_hooks(&mut hooks), 10);

        let attached: Vec<_> = hooks.log[..10].iter().map(|(_, t)| *t).collect();
        let detached: Vec<_> = hooks.log[10..].iter().map(|(_, t)| *t).collect();
        assert_eq!(attached, HookTarget::ALL);
        assert_eq!(detached.first(), Some(&HookTarget::WriteStringW));
        assert_eq!(detached.last(), Some(&HookTarget::GetStringA));
    }

    #[test]
    fn test_thread_detach_respects_option() {
        let redirector = Redirector::new(RedirectorOptions::default(), Arc::new(FileStore));
        assert!(redirector.on_thread_detach().is_none());

        let options = RedirectorOptions::default().with_save_on_thread_detach(true);
        let redirector = Redirector::new(options, Arc::new(FileStore));
        assert_eq!(redirector.on_thread_detach(), Some(FlushReport::default()));
    }
}
