//! HTTP request handlers for the web adapter.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::adapters::json_report_adapter::table_document;
use crate::domain::error::StockeaseError;
use crate::domain::metadata::{golden_cross_metadata, strategy_metadata};
use crate::domain::runner::run_golden_cross_momentum;
use crate::domain::screener::screen_symbol;
use crate::domain::volatility::VolatilityReport;

use super::{AppState, WebError};

pub async fn symbols(State(state): State<Arc<AppState>>) -> Result<Json<Value>, WebError> {
    let symbols = state.data_port.list_symbols()?;
    Ok(Json(json!({ "symbols": symbols })))
}

pub async fn golden_cross(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, WebError> {
    let config = &state.engine.golden_cross;
    let series = state.data_port.fetch_series(&symbol)?;
    let table = run_golden_cross_momentum(&series, config)?;
    Ok(Json(table_document(&table, &golden_cross_metadata(config))))
}

pub async fn ma_crossover(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, WebError> {
    let runner = state.engine.strategy_runner()?;
    let series = state.data_port.fetch_series(&symbol)?;
    let table = runner.run(&series)?;
    Ok(Json(table_document(&table, &strategy_metadata(runner.strategies()))))
}

#[derive(Debug, Deserialize)]
pub struct VolatilityQuery {
    pub as_of: Option<NaiveDate>,
    pub lookback: Option<usize>,
}

pub async fn volatility(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<VolatilityQuery>,
) -> Result<Json<VolatilityReport>, WebError> {
    let lookback = query.lookback.unwrap_or(state.engine.volatility_lookback);
    if lookback == 0 {
        return Err(StockeaseError::non_positive("lookback", lookback).into());
    }
    let series = state.data_port.fetch_series(&symbol)?;
    let report = VolatilityReport::for_series(&series, query.as_of, lookback)
        .ok_or_else(|| StockeaseError::NoData {
            symbol: symbol.clone(),
        })?;
    Ok(Json(report))
}

/// Snapshots every symbol, one blocking task per symbol. A failing symbol is
/// left out of the response.
pub async fn stocks(State(state): State<Arc<AppState>>) -> Result<Json<Value>, WebError> {
    let symbols = state.data_port.list_symbols()?;
    let lookback = state.engine.volatility_lookback;

    let mut tasks = JoinSet::new();
    for symbol in symbols {
        let data_port = Arc::clone(&state.data_port);
        tasks.spawn_blocking(move || {
            let result = screen_symbol(data_port.as_ref(), &symbol, lookback);
            (symbol, result)
        });
    }

    let mut snapshots = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(Some(snapshot)))) => snapshots.push(snapshot),
            Ok((symbol, Ok(None))) => debug!(symbol = %symbol, "no bars, skipping"),
            Ok((symbol, Err(e))) => warn!(symbol = %symbol, error = %e, "skipping symbol"),
            Err(e) => warn!(error = %e, "snapshot task failed"),
        }
    }
    snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    Ok(Json(json!({ "stocks": snapshots })))
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such route")
}
