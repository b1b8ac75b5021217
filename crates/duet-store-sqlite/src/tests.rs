//! Integration tests for `SqliteLog` against an in-memory database.

use duet_core::{
  answer::canonical_header,
  catalog::Catalog,
  log::AnswerLog,
  reader::{HeaderStatus, read_answers},
  remaining::Progress,
  session::{Presentation, Session},
};

use crate::SqliteLog;

async fn log() -> SqliteLog {
  SqliteLog::open_in_memory()
    .await
    .expect("in-memory log")
}

fn cells(v: &[&str]) -> Vec<String> { v.iter().map(|s| (*s).to_owned()).collect() }

// ─── Raw operations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn new_log_is_empty() {
  let l = log().await;
  assert!(l.read_all().await.unwrap().is_empty());
  assert_eq!(l.row_count().await.unwrap(), 0);
}

#[tokio::test]
async fn rows_come_back_in_append_order_with_timestamps() {
  let l = log().await;
  l.append_row(canonical_header()).await.unwrap();
  l.append_row(cells(&["Honey", "Cheese", "5"])).await.unwrap();
  l.append_rows(vec![cells(&["Honey", "Tuna", "1"]), cells(&["Cheese", "Tuna", "2"])])
    .await
    .unwrap();

  let rows = l.read_all().await.unwrap();
  assert_eq!(rows.len(), 4);
  assert_eq!(rows[0].cells, ["Item1", "Item2", "Score"]);
  assert_eq!(rows[3].cells, ["Cheese", "Tuna", "2"]);
  assert!(rows.iter().all(|r| r.appended_at.is_some()));
}

#[tokio::test]
async fn cells_round_trip_unusual_text() {
  let l = log().await;
  let odd = cells(&["Gruyère", "\"quoted\", with comma", ""]);
  l.append_row(odd.clone()).await.unwrap();
  assert_eq!(l.read_all().await.unwrap()[0].cells, odd);
}

#[tokio::test]
async fn append_rows_with_nothing_is_a_noop() {
  let l = log().await;
  l.append_rows(Vec::new()).await.unwrap();
  assert_eq!(l.row_count().await.unwrap(), 0);
}

#[tokio::test]
async fn clear_and_reset_keeps_only_the_header() {
  let l = log().await;
  l.append_rows(vec![
    cells(&["Product1", "Product2", "TasteScore"]),
    cells(&["Pasta", "Pesto", "5"]),
  ])
  .await
  .unwrap();

  l.clear_and_reset(canonical_header()).await.unwrap();
  let rows = l.read_all().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].cells, canonical_header());
}

#[tokio::test]
async fn file_backed_log_survives_reopen() {
  let path = std::env::temp_dir().join(format!(
    "duet-store-test-{}-{}.db",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));

  {
    let l = SqliteLog::open(&path).await.unwrap();
    l.append_row(canonical_header()).await.unwrap();
    l.append_row(cells(&["A", "B", "3"])).await.unwrap();
  }

  let reopened = SqliteLog::open(&path).await.unwrap();
  assert_eq!(reopened.row_count().await.unwrap(), 2);

  drop(reopened);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}

// ─── Through the engine ──────────────────────────────────────────────────────

#[tokio::test]
async fn reader_bootstraps_header_in_sqlite() {
  let l = log().await;
  let report = read_answers(&l, &Catalog::load(["A", "B"])).await.unwrap();
  assert_eq!(report.header, HeaderStatus::Bootstrapped);
  assert_eq!(l.row_count().await.unwrap(), 1);
}

#[tokio::test]
async fn session_persists_answers_across_sessions() {
  let l = log().await;
  let items = ["Pasta", "Pesto", "Parmesan"];

  let mut first = Session::open(l.clone(), Catalog::load(items)).await.unwrap();
  first.submit(5).await.unwrap();
  first.submit(4).await.unwrap();
  drop(first);

  let second = Session::open(l.clone(), Catalog::load(items)).await.unwrap();
  assert_eq!(second.global_progress(), Progress { answered: 2, total: 3 });
  match second.current_display() {
    Presentation::Pair { anchor_item, other_item, .. } => {
      assert_eq!(anchor_item.as_str(), "Pesto");
      assert_eq!(other_item.as_str(), "Parmesan");
    }
    Presentation::Done { .. } => panic!("one pair should remain"),
  }
}

#[tokio::test]
async fn retiring_never_shrinks_the_table() {
  let l = log().await;
  let mut s = Session::open(l.clone(), Catalog::load(["A", "B", "C"])).await.unwrap();
  s.submit(3).await.unwrap();
  let rows = l.row_count().await.unwrap();

  s.on_catalog_change(["A", "B", "C"]).await.unwrap();
  assert_eq!(l.row_count().await.unwrap(), rows);
  assert_eq!(s.global_progress(), Progress { answered: 0, total: 0 });
}
