//! The coordinator: owns per-attempt filter instances,
//! runs the whitelist-fast-path / escalation algorithm in `ask`, and
//! applies the outcome in `inform`. Both are wrapped in the fallback
//! adapter — a store or logic failure here must degrade to "permit",
//! never propagate to the authentication caller.

use std::cell::Cell;
use std::net::IpAddr;
use std::sync::Arc;

use crate::engine::capabilities::Capabilities;
use crate::engine::collaborators::{HistorySink, UserExistsLookup};
use crate::engine::config::SentryConfig;
use crate::engine::fallback;
use crate::engine::filter_a::FilterA;
use crate::engine::filter_b::FilterB;
use crate::engine::filter_w::FilterW;
use crate::engine::rng::{DelayRng, ThreadRng};
use crate::errors::SentryResult;
use crate::store::Store;

/// Per-attempt coordinator. Construct one per login attempt; it is
/// cheap (no I/O happens until `ask`/`inform` run) and is not meant to
/// outlive a single attempt.
pub struct Sentry {
    ip: String,
    parsed_ip: Option<IpAddr>,
    account: String,
    store: Arc<dyn Store>,
    history: Arc<dyn HistorySink>,
    user_exists: Arc<dyn UserExistsLookup>,
    config: SentryConfig,
    rng: Arc<dyn DelayRng>,
    user_exists_cache: Cell<Option<bool>>,
    whitelisted: bool,
}

impl Sentry {
    pub fn new(
        ip: impl Into<String>,
        account: impl Into<String>,
        store: Arc<dyn Store>,
        history: Arc<dyn HistorySink>,
        user_exists: Arc<dyn UserExistsLookup>,
        config: SentryConfig,
    ) -> Self {
        let ip = ip.into();
        let parsed_ip = ip.parse().ok();
        Self {
            ip,
            parsed_ip,
            account: account.into(),
            store,
            history,
            user_exists,
            config,
            rng: Arc::new(ThreadRng),
            user_exists_cache: Cell::new(None),
            whitelisted: false,
        }
    }

    /// Override the random source, for deterministic tests of the
    /// implicit-random escalation tiers.
    pub fn with_rng(mut self, rng: Arc<dyn DelayRng>) -> Self {
        self.rng = rng;
        self
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities {
            store: self.store.as_ref(),
            history: self.history.as_ref(),
            user_exists: self.user_exists.as_ref(),
            user_exists_cache: &self.user_exists_cache,
            config: &self.config,
            rng: self.rng.as_ref(),
        }
    }

    /// Decide whether to permit this attempt. Empty string = permit;
    /// non-empty = the denial message to show the caller.
    pub async fn ask(&mut self) -> String {
        let ip = self.ip.clone();
        let account = self.account.clone();
        let pair_is_whitelisted = Cell::new(false);

        let result = fallback::wrap(
            "Sentry::ask",
            async {
                let caps = self.capabilities();
                let fw = FilterW::new(&ip, &account);

                let res = fw.test(&caps).await?;
                if !res.message.is_empty() {
                    pair_is_whitelisted.set(true);
                    return Ok::<String, crate::errors::SentryError>(res.message);
                }

                if fw.is_whitelisted(&caps).await? {
                    pair_is_whitelisted.set(true);
                    return Ok(String::new());
                }

                let fa = FilterA::new(&ip, &account);
                let fb = FilterB::new(self.parsed_ip, &account);
                let ra = fa.test(&caps).await?;
                let rb = fb.test(&caps).await?;

                let a_tuple = (ra.seconds, ra.message);
                let b_tuple = (rb.seconds, rb.message);
                Ok(std::cmp::max(a_tuple, b_tuple).1)
            },
            String::new(),
        )
        .await;

        if pair_is_whitelisted.get() {
            self.whitelisted = true;
        }
        result
    }

    /// Record the outcome of the attempt. Empty string = no additional
    /// block landed; non-empty = a block just engaged.
    pub async fn inform(&mut self, success: bool) -> String {
        let ip = self.ip.clone();
        let account = self.account.clone();
        let whitelisted = self.whitelisted;

        fallback::wrap(
            "Sentry::inform",
            async {
                let caps = self.capabilities();
                let fw = FilterW::new(&ip, &account);

                if success {
                    fw.whitelist(&caps).await?;
                    return Ok::<String, crate::errors::SentryError>(String::new());
                }

                if whitelisted {
                    let (_, message) = fw.update(&caps).await?;
                    return Ok(message);
                }

                let fa = FilterA::new(&ip, &account);
                let fb = FilterB::new(self.parsed_ip, &account);
                let ra = fa.update(&caps).await?;
                let rb = fb.update(&caps).await?;
                Ok(std::cmp::max(ra, rb).1)
            },
            String::new(),
        )
        .await
    }
}
