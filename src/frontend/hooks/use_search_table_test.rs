use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use tokio::sync::broadcast::error::RecvError;

use super::use_search_table::TableMirror;
use crate::table::{
    PaginationData, RequestError, RequestParams, SearchTable, SearchTableOptions, TableEvent,
};

type Table = SearchTable<RequestParams, RequestParams, String>;

fn table(failing: Rc<Cell<bool>>) -> Table {
    let source = move |_params: RequestParams| {
        let fail = failing.get();
        async move {
            if fail {
                Err(RequestError::network("offline"))
            } else {
                Ok(PaginationData {
                    page: 1,
                    size: 10,
                    total: 2,
                    total_page: 1,
                    list: vec!["a".to_string(), "b".to_string()],
                })
            }
        }
    };
    SearchTable::new(SearchTableOptions::new(RequestParams::new(), source))
}

fn data_updated() -> TableEvent {
    TableEvent::DataUpdated {
        rows: 2,
        current_page: 1,
        total: 2,
        total_pages: 1,
    }
}

#[tokio::test]
async fn lagged_receive_resyncs_state_and_keeps_last_error() {
    let owner = Owner::new();
    let failing = Rc::new(Cell::new(false));
    let table = table(failing.clone());
    let (mirror, stored) = owner.with(|| {
        (
            TableMirror::new(table.pagination()),
            StoredValue::new_local(table.clone()),
        )
    });

    table.search().await.unwrap();
    failing.set(true);
    let message = table.change_page(2).await.unwrap_err().to_string();
    assert!(mirror.apply(Ok(TableEvent::FetchFailed { message }), stored));

    assert!(mirror.apply(Err(RecvError::Lagged(3)), stored));

    assert_eq!(
        mirror.table_data.get_untracked(),
        vec!["a".to_string(), "b".to_string()]
    );
    assert_eq!(mirror.pagination.with_untracked(|p| p.total()), 2);
    assert!(!mirror.loading.get_untracked());
    assert_eq!(
        mirror.last_error.get_untracked().as_deref(),
        Some("List request failed")
    );
}

#[tokio::test]
async fn data_update_clears_last_error() {
    let owner = Owner::new();
    let table = table(Rc::new(Cell::new(false)));
    let (mirror, stored) = owner.with(|| {
        (
            TableMirror::new(table.pagination()),
            StoredValue::new_local(table.clone()),
        )
    });

    assert!(mirror.apply(
        Ok(TableEvent::FetchFailed {
            message: "List request failed".to_string(),
        }),
        stored,
    ));
    table.search().await.unwrap();
    assert!(mirror.apply(Ok(data_updated()), stored));

    assert_eq!(mirror.last_error.get_untracked(), None);
    assert_eq!(mirror.table_data.get_untracked().len(), 2);
}

#[test]
fn closed_channel_stops_the_mirror() {
    let owner = Owner::new();
    let table = table(Rc::new(Cell::new(false)));
    let (mirror, stored) = owner.with(|| {
        (
            TableMirror::new(table.pagination()),
            StoredValue::new_local(table.clone()),
        )
    });

    assert!(mirror.apply(Ok(TableEvent::LoadingChanged { loading: true }), stored));
    assert!(mirror.loading.get_untracked());
    assert!(!mirror.apply(Err(RecvError::Closed), stored));
}
