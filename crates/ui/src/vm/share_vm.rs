use stamp_core::StampCatalog;
use stamp_core::intake::share_url;
use stamp_core::model::StampId;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareLinkVm {
    pub id: StampId,
    pub url: String,
}

#[must_use]
pub fn map_share_links(base: &Url, catalog: &StampCatalog) -> Vec<ShareLinkVm> {
    catalog
        .ids()
        .map(|id| ShareLinkVm {
            id,
            url: share_url(base, id).to_string(),
        })
        .collect()
}
