//! Flatten scenario results into rows for tables, charts and CSV

use serde::Serialize;
use std::io::Write;

use crate::error::StressResult;
use crate::scenario::ScenarioResult;

/// Headline numbers shown above the charts ($M)
#[derive(Debug, Clone, Serialize)]
pub struct HeadlineMetrics {
    pub rate_shock_bps: i32,
    pub unrealized_loss: f64,
    pub withdrawal_amount: f64,
    pub realized_loss: f64,
    pub final_equity: f64,
    pub equity_delta: f64,
    pub capital_status: String,
}

/// One bar of the per-asset loss chart
#[derive(Debug, Clone, Serialize)]
pub struct AssetLossRow {
    pub name: String,
    pub loss: f64,
    pub loss_pct: f64,
}

/// One bar of the capital waterfall chart
#[derive(Debug, Clone, Serialize)]
pub struct EquityBridgeRow {
    pub label: &'static str,
    pub amount: f64,
}

/// One CSV record per evaluated grid point
#[derive(Debug, Clone, Serialize)]
pub struct SweepRecord {
    #[serde(rename = "RateShockBps")]
    pub rate_shock_bps: i32,
    #[serde(rename = "WithdrawalPct")]
    pub withdrawal_pct: f64,
    #[serde(rename = "LossFraction")]
    pub aggregate_loss_fraction: f64,
    #[serde(rename = "Withdrawal")]
    pub withdrawal_amount: f64,
    #[serde(rename = "CashUsed")]
    pub cash_used: f64,
    #[serde(rename = "AfsLoss")]
    pub afs_loss_realized: f64,
    #[serde(rename = "HtmFaceSold")]
    pub htm_face_sold: f64,
    #[serde(rename = "HtmLoss")]
    pub htm_loss_realized: f64,
    #[serde(rename = "FinalEquity")]
    pub final_equity: f64,
    #[serde(rename = "Status")]
    pub capital_status: &'static str,
}

pub fn headline(result: &ScenarioResult) -> HeadlineMetrics {
    HeadlineMetrics {
        rate_shock_bps: result.params.rate_shock_bps,
        unrealized_loss: result.valuation.unrealized_loss(),
        withdrawal_amount: result.waterfall.withdrawal_amount,
        realized_loss: result.waterfall.total_loss_realized(),
        final_equity: result.waterfall.final_equity,
        equity_delta: result.waterfall.equity_delta,
        capital_status: result.capital_status.as_str().to_string(),
    }
}

pub fn asset_losses(result: &ScenarioResult) -> Vec<AssetLossRow> {
    result
        .valuation
        .positions
        .iter()
        .map(|r| AssetLossRow {
            name: r.name.clone(),
            loss: r.loss,
            loss_pct: r.loss_pct,
        })
        .collect()
}

/// Start equity, the two realized-loss bars (negative), final equity
pub fn equity_bridge(result: &ScenarioResult) -> Vec<EquityBridgeRow> {
    let w = &result.waterfall;
    vec![
        EquityBridgeRow { label: "Start Equity", amount: w.initial_equity },
        EquityBridgeRow { label: "AFS Losses", amount: -w.afs_loss_realized },
        EquityBridgeRow { label: "HTM Losses", amount: -w.htm_loss_realized },
        EquityBridgeRow { label: "Final Equity", amount: w.final_equity },
    ]
}

impl From<&ScenarioResult> for SweepRecord {
    fn from(result: &ScenarioResult) -> Self {
        let w = &result.waterfall;
        Self {
            rate_shock_bps: result.params.rate_shock_bps,
            withdrawal_pct: result.params.withdrawal_pct,
            aggregate_loss_fraction: result.valuation.aggregate_loss_fraction,
            withdrawal_amount: w.withdrawal_amount,
            cash_used: w.cash_used,
            afs_loss_realized: w.afs_loss_realized,
            htm_face_sold: w.htm_face_sold,
            htm_loss_realized: w.htm_loss_realized,
            final_equity: w.final_equity,
            capital_status: result.capital_status.as_str(),
        }
    }
}

/// Write the per-position valuation table as CSV
pub fn write_positions_csv<W: Write>(result: &ScenarioResult, writer: W) -> StressResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in &result.valuation.positions {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write one record per scenario as CSV
pub fn write_sweep_csv<'a, W, I>(results: I, writer: W) -> StressResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ScenarioResult>,
{
    let mut csv = csv::Writer::from_writer(writer);
    let mut count = 0;
    for result in results {
        csv.serialize(SweepRecord::from(result))?;
        count += 1;
    }
    csv.flush()?;
    Ok(count)
}

/// Human-readable summary for terminals
pub fn render_table<W: Write>(result: &ScenarioResult, out: &mut W) -> StressResult<()> {
    let m = headline(result);
    let w = &result.waterfall;

    writeln!(out, "Scenario: +{} bps, {:.0}% deposit run", m.rate_shock_bps, result.params.withdrawal_pct * 100.0)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<34} {:>6} {:>10} {:>8} {:>12} {:>12} {:>12} {:>9}",
        "Asset", "Mat", "Face", "Yield", "Initial", "Shocked", "Loss", "Loss %"
    )?;
    writeln!(out, "{}", "-".repeat(110))?;
    for r in &result.valuation.positions {
        writeln!(
            out,
            "{:<34} {:>6} {:>10.0} {:>7.2}% {:>12.2} {:>12.2} {:>12.2} {:>8.2}%",
            r.name,
            r.maturity,
            r.face,
            r.shocked_yield * 100.0,
            r.initial_price,
            r.shocked_price,
            r.loss,
            r.loss_pct,
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Unrealized portfolio loss: ${:.0} M ({:.2}%)", m.unrealized_loss, result.aggregate_loss_fraction() * 100.0)?;
    writeln!(out, "Depositor withdrawals:     ${:.0} M", m.withdrawal_amount)?;
    writeln!(out, "Losses realized on sales:  ${:.0} M", m.realized_loss)?;
    writeln!(out)?;

    writeln!(out, "Liquidity waterfall:")?;
    for draw in &w.tiers {
        writeln!(
            out,
            "  {:<5} raised {:>10.2}  sold {:>10.2}  loss {:>10.2}  owed after {:>10.2}",
            draw.tier.as_str(),
            draw.cash_raised,
            draw.book_sold,
            draw.loss_realized,
            draw.remaining_after,
        )?;
    }
    if w.tiers.is_empty() {
        writeln!(out, "  (no withdrawal)")?;
    }
    writeln!(out)?;

    for row in equity_bridge(result) {
        writeln!(out, "  {:<13} {:>12.2}", row.label, row.amount)?;
    }
    writeln!(out)?;
    writeln!(out, "Bank equity: ${:.0} M ({:+.0} M) [{}]", m.final_equity, m.equity_delta, m.capital_status)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ScenarioParameters, ScenarioRunner};
    use approx::assert_relative_eq;

    fn reference_result() -> ScenarioResult {
        ScenarioRunner::new().run(&ScenarioParameters::default()).unwrap()
    }

    #[test]
    fn test_equity_bridge_sums_to_final() {
        let result = reference_result();
        let bridge = equity_bridge(&result);

        assert_eq!(bridge.len(), 4);
        let flows: f64 = bridge[..3].iter().map(|r| r.amount).sum();
        assert_relative_eq!(flows, bridge[3].amount, epsilon = 1e-9);
        assert!(bridge[1].amount < 0.0 && bridge[2].amount < 0.0);
    }

    #[test]
    fn test_headline_realized_loss_matches_bridge() {
        let result = reference_result();
        let m = headline(&result);

        // 2,500 from AFS plus ~2,610.46 from HTM
        assert_relative_eq!(m.realized_loss, 5_110.4589, epsilon = 1e-3);
        assert_relative_eq!(m.realized_loss, -m.equity_delta, epsilon = 1e-9);
    }

    #[test]
    fn test_headline_no_run_realizes_nothing() {
        let result = ScenarioRunner::new().run(&ScenarioParameters::from_percent(500, 0)).unwrap();
        let m = headline(&result);

        assert_eq!(m.realized_loss, 0.0);
        assert!(m.unrealized_loss > 0.0);
    }

    #[test]
    fn test_asset_losses_follow_catalog() {
        let result = reference_result();
        let rows = asset_losses(&result);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].name, "30Y Agency MBS (Long Duration)");
        assert!(rows.iter().all(|r| r.loss < 0.0));
    }

    #[test]
    fn test_sweep_csv() {
        let runner = ScenarioRunner::new();
        let results: Vec<ScenarioResult> = runner
            .sweep(&[0, 300], &[0.25])
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        let mut buf = Vec::new();
        let count = write_sweep_csv(&results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(count, 2);
        assert!(text.starts_with("RateShockBps,WithdrawalPct,LossFraction"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_positions_csv_has_header_and_rows() {
        let mut buf = Vec::new();
        write_positions_csv(&reference_result(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.lines().next().unwrap().starts_with("name,face,coupon,maturity"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_render_table_mentions_status() {
        let mut buf = Vec::new();
        render_table(&reference_result(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("HTM"));
        assert!(text.contains("Losses realized on sales:  $5110 M"));
        assert!(text.contains("[STABLE]"));
    }
}
