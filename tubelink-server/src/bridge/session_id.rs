use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

/// Identifies one loading of embedded content. Every `load_content` starts a new session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BridgeSessionId(u64);

impl From<u64> for BridgeSessionId {
	fn from(id: u64) -> Self {
		BridgeSessionId(id)
	}
}

impl From<BridgeSessionId> for u64 {
	fn from(BridgeSessionId(id): BridgeSessionId) -> Self {
		id
	}
}

impl Display for BridgeSessionId {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		write!(formatter, "BridgeSession({})", self.0)
	}
}

#[derive(Default)]
pub struct BridgeSessionIdSequence {
	next_id: AtomicU64,
}

impl BridgeSessionIdSequence {
	pub fn next(&self) -> BridgeSessionId {
		// Using Relaxed memory ordering is ok because we only care about
		// the ordering of the value in the atomic and not any surrounding
		// loads or stores.
		BridgeSessionId(self.next_id.fetch_add(1, Relaxed))
	}
}
