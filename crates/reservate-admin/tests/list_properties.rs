//! Property tests for reservation list filtering and sorting

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use reservate_admin::{ListQuery, SortField, SortOrder, StateFilter};
use reservate_core::{Client, Reservation, ReservationState};

fn state_strategy() -> impl Strategy<Value = ReservationState> {
    prop_oneof![
        Just(ReservationState::Pending),
        Just(ReservationState::Confirmed),
        Just(ReservationState::InProgress),
        Just(ReservationState::Completed),
        Just(ReservationState::Cancelled),
        "[a-z_]{3,10}".prop_map(|raw| ReservationState::from_wire(&raw)),
    ]
}

prop_compose! {
    fn reservation_strategy()(
        code in "[0-9A-Z]{1,5}",
        name in "[A-Za-z]{1,8}",
        last_name in "[A-Za-z]{1,10}",
        has_client in any::<bool>(),
        total in 0.0f64..10_000.0,
        state in state_strategy(),
        seconds in 0i64..2_000_000_000,
    ) -> Reservation {
        Reservation {
            id: 0,
            code,
            reservation_date: Utc.timestamp_opt(seconds, 0).unwrap(),
            total_price: total,
            state,
            client: has_client.then(|| Client {
                id: 1,
                code: "C1".to_string(),
                name,
                last_name,
                phone: None,
                email: None,
            }),
            mechanic: None,
            services: Vec::new(),
        }
    }
}

fn sorted_codes(reservations: &[Reservation]) -> Vec<String> {
    let mut codes: Vec<String> = reservations.iter().map(|r| r.code.clone()).collect();
    codes.sort();
    codes
}

proptest! {
    #[test]
    fn neutral_query_keeps_every_record(
        records in prop::collection::vec(reservation_strategy(), 0..40),
        field in prop_oneof![
            Just(SortField::Code),
            Just(SortField::Date),
            Just(SortField::Client),
            Just(SortField::Total),
            Just(SortField::State),
        ],
    ) {
        let query = ListQuery {
            sort_field: field,
            ..ListQuery::default()
        };
        let result = query.apply(&records);
        prop_assert_eq!(sorted_codes(&result), sorted_codes(&records));
    }

    #[test]
    fn exact_last_name_search_includes_the_record(
        records in prop::collection::vec(reservation_strategy(), 1..20),
        pick in any::<prop::sample::Index>(),
        upper in any::<bool>(),
    ) {
        let target = &records[pick.index(records.len())];
        prop_assume!(target.client.is_some());
        let last_name = target.client.as_ref().unwrap().last_name.clone();
        let term = if upper { last_name.to_uppercase() } else { last_name.to_lowercase() };

        let query = ListQuery {
            search_term: term,
            state_filter: StateFilter::All,
            ..ListQuery::default()
        };
        prop_assert!(query.matches(target));
        prop_assert!(query.apply(&records).iter().any(|r| r == target));
    }

    #[test]
    fn total_descending_reverses_ascending(
        totals in prop::collection::hash_set(0u32..1_000_000, 0..30),
    ) {
        let records: Vec<Reservation> = totals
            .into_iter()
            .enumerate()
            .map(|(i, cents)| Reservation {
                id: 0,
                code: i.to_string(),
                reservation_date: Utc.timestamp_opt(0, 0).unwrap(),
                total_price: f64::from(cents) / 100.0,
                state: ReservationState::Pending,
                client: None,
                mechanic: None,
                services: Vec::new(),
            })
            .collect();

        let ascending = ListQuery {
            sort_field: SortField::Total,
            sort_order: SortOrder::Ascending,
            ..ListQuery::default()
        }
        .apply(&records);
        let mut descending = ListQuery {
            sort_field: SortField::Total,
            sort_order: SortOrder::Descending,
            ..ListQuery::default()
        }
        .apply(&records);
        descending.reverse();

        prop_assert_eq!(ascending, descending);
    }
}
