//! Plain-text rendering of records for the terminal.

use shared_types::{to_rfc3339, Escrow, Ticket};
use tl_02_money_codec::to_display_unit;
use tl_03_ticket_lifecycle::{BalanceReport, EnrichedListing, Purchase};
use tl_04_qr_claim::{ClaimOutcome, ValidationResult};
use tl_05_gate_scan::{ScanRecord, ScanStatistics};

/// Shorten long object ids for tables.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 14 {
        return id.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Ticket detail block.
pub fn ticket(ticket: &Ticket) -> String {
    let mut out = format!(
        "Ticket {}\n  Event:    {}\n  Date:     {}\n  Artifact: {}\n",
        ticket.id, ticket.event_name, ticket.event_date, ticket.artifact_ref
    );
    if let Some(owner) = &ticket.owner {
        out.push_str(&format!("  Owner:    {}\n", owner));
    }
    if ticket.original_issuer_verified {
        out.push_str("  Original issuer verified\n");
    }
    out
}

/// Escrow detail block.
pub fn escrow(escrow: &Escrow) -> String {
    format!(
        "Escrow {}\n  Status: {}\n  Amount: {}\n  Ticket: {}\n  Seller: {}\n  Buyer:  {}\n",
        escrow.id,
        escrow.status,
        to_display_unit(escrow.amount),
        escrow.ticket_id,
        escrow.seller,
        escrow.buyer
    )
}

/// One line per listing.
pub fn listing(entry: &EnrichedListing) -> String {
    format!(
        "{}  {:>12}  {}  {}  seller {}",
        short_id(entry.listing.id.as_str()),
        to_display_unit(entry.listing.price),
        entry.ticket.event_date,
        entry.ticket.event_name,
        short_id(entry.listing.seller_address.as_str())
    )
}

/// One line per owned ticket.
pub fn purchase(entry: &Purchase) -> String {
    let escrow = match &entry.escrow {
        Some(escrow) => format!(
            "escrow {} {} {}",
            short_id(escrow.id.as_str()),
            escrow.status,
            to_display_unit(escrow.amount)
        ),
        None => "no escrow".to_string(),
    };
    format!(
        "{}  {}  {}  {}",
        short_id(entry.ticket.id.as_str()),
        entry.ticket.event_date,
        entry.ticket.event_name,
        escrow
    )
}

/// Balance line, with a warning when low.
pub fn balance(report: &BalanceReport) -> String {
    let mut out = format!(
        "{} on {}: {} ({} smallest units)",
        report.address, report.network, report.display, report.balance
    );
    if report.low_balance {
        out.push_str("\n  Low balance: request test funds before submitting transactions");
        for faucet in report.network.faucets() {
            out.push_str(&format!("\n  {}", faucet));
        }
    }
    out
}

/// Verdict block for a validated claim.
pub fn verdict(result: &ValidationResult) -> String {
    let when = to_rfc3339(result.scanned_at);
    match &result.outcome {
        ClaimOutcome::Valid {
            ticket,
            platform,
            is_original_issuer,
            ..
        } => {
            let mut out = format!(
                "VALID TICKET [{}] at {}\n  Event:    {}\n  Date:     {}\n  Ticket:   {}\n  Platform: {}\n",
                result.network, when, ticket.event_name, ticket.event_date, ticket.id, platform
            );
            if *is_original_issuer {
                out.push_str("  Original issuer verified\n");
            }
            out
        }
        ClaimOutcome::Rejected(rejection) => format!(
            "INVALID TICKET [{}] at {}\n  {}\n",
            result.network, when, rejection
        ),
    }
}

/// Verdict plus duplicate warning for a gate scan.
pub fn scan(record: &ScanRecord) -> String {
    let mut out = format!("#{} ", record.id);
    out.push_str(&verdict(&record.result));
    if let Some(warning) = &record.warning {
        out.push_str(&format!("  WARNING: {}\n", warning));
    }
    out
}

/// Running tally line.
pub fn statistics(stats: &ScanStatistics) -> String {
    format!(
        "Total {} | Valid {} | Invalid {} | Duplicate {} | Success {:.1}%",
        stats.total,
        stats.valid,
        stats.invalid,
        stats.duplicate,
        stats.success_rate()
    )
}
