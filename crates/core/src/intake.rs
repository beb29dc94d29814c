//! Reading and writing the `point` query parameter that carries a stamp id.

use url::Url;

use crate::catalog::StampCatalog;
use crate::model::StampId;

/// Query parameter naming the stamp a visit collects.
pub const POINT_PARAM: &str = "point";

/// What the `point` parameter of a URL says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointParam {
    Absent,
    Malformed(String),
    OutOfRange(StampId),
    Valid(StampId),
}

impl PointParam {
    #[must_use]
    pub fn valid(&self) -> Option<StampId> {
        match self {
            Self::Valid(id) => Some(*id),
            _ => None,
        }
    }
}

/// Inspect the first `point` parameter of `url` against `catalog`.
#[must_use]
pub fn read_point(url: &Url, catalog: &StampCatalog) -> PointParam {
    let Some(raw) = url
        .query_pairs()
        .find(|(name, _)| name == POINT_PARAM)
        .map(|(_, value)| value.into_owned())
    else {
        return PointParam::Absent;
    };

    match raw.parse::<StampId>() {
        Ok(id) if catalog.contains(id) => PointParam::Valid(id),
        Ok(id) => PointParam::OutOfRange(id),
        Err(_) => PointParam::Malformed(raw),
    }
}

/// `url` without any `point` parameter. Other parameters and the fragment stay;
/// an emptied query is dropped entirely.
#[must_use]
pub fn strip_point(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != POINT_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

/// Link that collects stamp `id` when visited: `<origin><path>?point=<id>`.
#[must_use]
pub fn share_url(base: &Url, id: StampId) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair(POINT_PARAM, &id.to_string());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn reads_valid_point() {
        let catalog = StampCatalog::standard();
        assert_eq!(
            read_point(&url("https://shop.example/card?point=3"), &catalog),
            PointParam::Valid(StampId::new(3))
        );
    }

    #[test]
    fn classifies_irrelevant_visits() {
        let catalog = StampCatalog::standard();
        assert_eq!(
            read_point(&url("https://shop.example/card"), &catalog),
            PointParam::Absent
        );
        assert_eq!(
            read_point(&url("https://shop.example/card?point=abc"), &catalog),
            PointParam::Malformed("abc".into())
        );
        assert_eq!(
            read_point(&url("https://shop.example/card?point="), &catalog),
            PointParam::Malformed(String::new())
        );
        assert_eq!(
            read_point(&url("https://shop.example/card?point=7"), &catalog),
            PointParam::OutOfRange(StampId::new(7))
        );
        assert_eq!(
            read_point(&url("https://shop.example/card?point=0"), &catalog),
            PointParam::OutOfRange(StampId::new(0))
        );
    }

    #[test]
    fn first_point_wins() {
        let catalog = StampCatalog::standard();
        assert_eq!(
            read_point(&url("https://shop.example/?point=2&point=5"), &catalog).valid(),
            Some(StampId::new(2))
        );
    }

    #[test]
    fn strip_keeps_other_params_and_fragment() {
        let stripped = strip_point(&url("https://shop.example/card?utm=qr&point=4#top"));
        assert_eq!(stripped.as_str(), "https://shop.example/card?utm=qr#top");

        let bare = strip_point(&url("https://shop.example/card?point=4"));
        assert_eq!(bare.as_str(), "https://shop.example/card");
    }

    #[test]
    fn share_url_replaces_query() {
        let base = url("https://shop.example/card?point=1&x=y#frag");
        assert_eq!(
            share_url(&base, StampId::new(5)).as_str(),
            "https://shop.example/card?point=5"
        );
    }
}
