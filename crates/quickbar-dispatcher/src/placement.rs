//! Search destination resolution.

use quickbar_types::{END_TAB_INDEX, Placement, TabId, TabInfo};

use crate::host::{BLANK_URL, CreateTab};

/// Where a search result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabTarget {
    /// Reuse the sender's tab.
    Existing(TabId),
    /// Open a blank tab first.
    New(CreateTab),
}

/// Map a placement setting and the sender tab to a destination.
#[must_use]
pub fn resolve_target(placement: Placement, sender: TabInfo) -> TabTarget {
    let index = match placement {
        Placement::Current => return TabTarget::Existing(sender.id),
        Placement::Start => 0,
        Placement::End => END_TAB_INDEX,
        Placement::Before => sender.index,
        Placement::After => sender.index + 1,
    };

    TabTarget::New(CreateTab {
        opener_tab_id: sender.id,
        url: BLANK_URL.to_string(),
        index,
    })
}
