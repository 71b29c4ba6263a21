//! Listing filters: keyword, region and city.
//!
//! Each filter only removes records, so the result keeps the input order and
//! does not depend on which filter runs first.

use crate::domain::normalize::{keyword_form, normalize_city};
use crate::domain::region::Region;
use crate::domain::restaurant::Restaurant;
use serde::Serialize;
use tracing::debug;

/// Raw listing parameters as received. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingQuery {
    pub keyword: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

/// Filters resolved once per request.
struct Predicates {
    keyword: Option<String>,
    region: Option<Region>,
    city: Option<String>,
}

impl ListingQuery {
    fn predicates(&self) -> Predicates {
        let keyword = non_blank(&self.keyword).map(keyword_form);
        let region = non_blank(&self.region).and_then(|raw| {
            let parsed = Region::parse(raw);
            if parsed.is_none() {
                debug!(region = raw, "ignoring unknown region filter");
            }
            parsed
        });
        let city = non_blank(&self.city).map(normalize_city);
        Predicates {
            keyword,
            region,
            city,
        }
    }

    pub fn keyword_text(&self) -> &str {
        non_blank(&self.keyword).unwrap_or("")
    }

    pub fn region_text(&self) -> &str {
        non_blank(&self.region).unwrap_or("")
    }

    pub fn city_text(&self) -> &str {
        non_blank(&self.city).unwrap_or("")
    }
}

impl Predicates {
    fn matches(&self, r: &Restaurant) -> bool {
        self.keyword_matches(r) && self.region_matches(r) && self.city_matches(r)
    }

    fn keyword_matches(&self, r: &Restaurant) -> bool {
        let Some(keyword) = &self.keyword else {
            return true;
        };
        let district = r.district.as_deref().unwrap_or("");
        [r.name.as_str(), r.city.as_str(), district]
            .iter()
            .any(|field| keyword_form(field).contains(keyword.as_str()))
    }

    fn region_matches(&self, r: &Restaurant) -> bool {
        self.region
            .map_or(true, |region| region.contains(&normalize_city(&r.city)))
    }

    fn city_matches(&self, r: &Restaurant) -> bool {
        self.city
            .as_ref()
            .map_or(true, |city| normalize_city(&r.city) == *city)
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Records from `all` that pass every filter in `query`, in input order.
pub fn filter_restaurants<'a>(all: &'a [Restaurant], query: &ListingQuery) -> Vec<&'a Restaurant> {
    let predicates = query.predicates();
    all.iter().filter(|r| predicates.matches(r)).collect()
}

/// Distinct non-empty cities of `all` in first-seen order, canonicalized.
pub fn distinct_cities(all: &[Restaurant]) -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for r in all {
        let city = normalize_city(&r.city);
        if !city.is_empty() && !cities.contains(&city) {
            cities.push(city);
        }
    }
    cities
}

/// Everything the listing page and listing API need.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub restaurants: Vec<Restaurant>,
    /// Cities present in the whole store, not just the filtered result.
    pub cities: Vec<String>,
    pub regions: Vec<String>,
    pub total: usize,
    pub query: ListingQuery,
}

impl Listing {
    pub fn build(all: &[Restaurant], query: ListingQuery) -> Self {
        let restaurants: Vec<Restaurant> = filter_restaurants(all, &query)
            .into_iter()
            .cloned()
            .collect();
        Self {
            total: restaurants.len(),
            restaurants,
            cities: distinct_cities(all),
            regions: Region::ALL.iter().map(|r| r.label().to_string()).collect(),
            query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn restaurant(id: &str, name: &str, city: &str, district: Option<&str>) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            address: format!("{city}某路{id}號"),
            city: city.to_string(),
            region: None,
            district: district.map(str::to_string),
            comments: Vec::new(),
            extra: Map::new(),
        }
    }

    fn query(keyword: Option<&str>, region: Option<&str>, city: Option<&str>) -> ListingQuery {
        ListingQuery {
            keyword: keyword.map(str::to_string),
            region: region.map(str::to_string),
            city: city.map(str::to_string),
        }
    }

    fn ids(found: Vec<&Restaurant>) -> Vec<&str> {
        found.into_iter().map(|r| r.id.as_str()).collect()
    }

    fn sample() -> Vec<Restaurant> {
        vec![
            restaurant("a", "Din Tai Fung", "台北市", Some("大安區")),
            restaurant("b", "鴨肉珍", "高雄市", None),
            restaurant("c", "度小月", "臺南市", Some("中西區")),
            restaurant("d", "Chun Shui Tang", "臺北市", None),
        ]
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let all = sample();
        let everything = ["a", "b", "c", "d"];
        assert_eq!(ids(filter_restaurants(&all, &ListingQuery::default())), everything);
        let blank = query(Some("  "), Some(""), Some(" "));
        assert_eq!(ids(filter_restaurants(&all, &blank)), everything);
    }

    #[test]
    fn region_then_city_narrow_conjunctively() {
        let all = sample();
        assert_eq!(ids(filter_restaurants(&all, &query(None, Some("北"), None))), ["a", "d"]);
        assert_eq!(
            ids(filter_restaurants(&all, &query(None, Some("北"), Some("台北市")))),
            ["a", "d"]
        );
        assert!(filter_restaurants(&all, &query(None, Some("北"), Some("高雄市"))).is_empty());
    }

    #[test]
    fn unknown_region_is_ignored() {
        let all = sample();
        let unknown = query(None, Some("火星"), None);
        assert_eq!(ids(filter_restaurants(&all, &unknown)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn city_filter_folds_variant() {
        let all = sample();
        assert_eq!(ids(filter_restaurants(&all, &query(None, None, Some(" 臺北市")))), ["a", "d"]);
        assert_eq!(ids(filter_restaurants(&all, &query(None, None, Some("台南市")))), ["c"]);
    }

    #[test]
    fn keyword_matches_name_city_and_district() {
        let all = sample();
        assert_eq!(ids(filter_restaurants(&all, &query(Some("din tai"), None, None))), ["a"]);
        assert_eq!(ids(filter_restaurants(&all, &query(Some("TANG"), None, None))), ["d"]);
        assert_eq!(ids(filter_restaurants(&all, &query(Some("高雄"), None, None))), ["b"]);
        assert_eq!(ids(filter_restaurants(&all, &query(Some("中西"), None, None))), ["c"]);
        assert_eq!(ids(filter_restaurants(&all, &query(Some("臺北"), None, None))), ["a", "d"]);
    }

    #[test]
    fn missing_district_never_matches_district_keyword() {
        let all = sample();
        assert!(filter_restaurants(&all, &query(Some("鹽埕區"), None, None)).is_empty());
    }

    #[test]
    fn filter_order_does_not_matter() {
        let all = sample();
        let q = query(Some("a"), Some("北"), Some("台北市"));
        let combined = ids(filter_restaurants(&all, &q));

        let by_city: Vec<Restaurant> = filter_restaurants(&all, &query(None, None, Some("台北市")))
            .into_iter()
            .cloned()
            .collect();
        let by_keyword: Vec<Restaurant> =
            filter_restaurants(&by_city, &query(Some("a"), None, None))
                .into_iter()
                .cloned()
                .collect();
        let stepwise = ids(filter_restaurants(&by_keyword, &query(None, Some("北"), None)));
        assert_eq!(combined, stepwise);
    }

    #[test]
    fn distinct_cities_come_from_the_full_collection() {
        let mut all = sample();
        all.push(restaurant("e", "阿宗麵線", "  台北市 ", None));
        all.push(restaurant("f", "no city", "", None));
        assert_eq!(distinct_cities(&all), ["台北市", "高雄市", "台南市"]);

        let listing = Listing::build(&all, query(None, None, Some("高雄市")));
        assert_eq!(listing.total, 1);
        assert_eq!(listing.cities, ["台北市", "高雄市", "台南市"]);
        assert_eq!(listing.regions, ["北", "中", "南", "東", "離島"]);
    }
}
