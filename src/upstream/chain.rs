//! The `/chain` pipeline: three GETs issued strictly in order.

use axum::http::StatusCode;
use thiserror::Error;
use tracing::Instrument;

use crate::config::TargetsConfig;
use crate::upstream::client::{UpstreamClient, UpstreamError};

/// A hop failed; the hops after it were never started.
#[derive(Debug, Error)]
#[error("chain hop {hop} ({url}) failed: {source}")]
pub struct ChainError {
    /// 1-based index of the failing hop.
    pub hop: usize,
    pub url: String,
    #[source]
    pub source: UpstreamError,
}

/// One outbound call in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// `host:port` of the peer.
    pub target: String,
    pub path: &'static str,
}

impl Hop {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.target, self.path)
    }
}

/// Result of a completed hop.
#[derive(Debug, Clone)]
pub struct HopOutcome {
    pub hop: usize,
    pub url: String,
    pub status: StatusCode,
    pub body_bytes: usize,
}

/// Ordered list of hops.
#[derive(Debug, Clone)]
pub struct ChainPlan {
    hops: Vec<Hop>,
}

impl ChainPlan {
    /// Own root, then target one's `/io_task`, then target two's `/cpu_task`.
    pub fn from_targets(targets: &TargetsConfig) -> Self {
        Self {
            hops: vec![
                Hop {
                    target: targets.self_svc.clone(),
                    path: "/",
                },
                Hop {
                    target: targets.target_one_svc.clone(),
                    path: "/io_task",
                },
                Hop {
                    target: targets.target_two_svc.clone(),
                    path: "/cpu_task",
                },
            ],
        }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Run every hop in order. Each hop completes before the next starts,
    /// and the first failure ends the chain. Every hop gets its own span, so
    /// the trace context sent to the peer names that hop.
    pub async fn run(
        &self,
        client: &UpstreamClient,
        request_id: Option<&str>,
    ) -> Result<Vec<HopOutcome>, ChainError> {
        let mut outcomes = Vec::with_capacity(self.hops.len());

        for (index, hop) in self.hops.iter().enumerate() {
            let hop_number = index + 1;
            let url = hop.url();
            let span = tracing::info_span!("chain_hop", hop = hop_number, url = %url);

            let response = client
                .get(&url, request_id)
                .instrument(span)
                .await
                .map_err(|source| ChainError {
                    hop: hop_number,
                    url: url.clone(),
                    source,
                })?;

            outcomes.push(HopOutcome {
                hop: hop_number,
                url,
                status: response.status,
                body_bytes: response.body.len(),
            });
        }

        Ok(outcomes)
    }
}
