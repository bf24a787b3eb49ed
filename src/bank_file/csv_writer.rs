use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::bank_file::{ControlRow, ReassignmentRow};

pub const HEADER: [&str; 7] = [
    "Numero de tarjeta",
    "Descripcion",
    "Signo",
    "Monto",
    "Fecha de Inicio",
    "Fecha de Fin",
    "Cambio de Estatus"
];

const AMOUNT_WIDTH: usize = 11;

/// Renders the bank import document.
///
/// Fields are joined verbatim, without CSV quoting: the bank importer reads
/// positional columns and its handling of quoted fields is unknown, so a
/// description containing a separator is written as-is and only logged.
pub fn generate_csv(rows: &[ReassignmentRow], control: &ControlRow) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(HEADER.join(","));

    for row in rows {
        if row.description.contains([',', '"', '\n', '\r']) {
            warn!("Description for card [{}] contains a CSV separator and will shift its columns: {:?}", row.card_number, row.description);
        }

        let amount = format!("{:0>width$}", two_decimals(row.amount), width = AMOUNT_WIDTH);

        lines.push([
            row.card_number.as_str(),
            row.description.as_str(),
            row.sign.as_str(),
            amount.as_str(),
            row.start_date.as_str(),
            row.end_date.as_str(),
            row.status_change.as_str()
        ].join(","));
    }

    let total_amount = two_decimals(control.total_amount);
    let record_count = control.record_count.to_string();

    lines.push([
        control.client_number.as_str(),
        control.group_number.as_str(),
        control.send_date.as_str(),
        total_amount.as_str(),
        record_count.as_str(),
        "",
        ""
    ].join(","));

    lines.join("\n")
}

fn two_decimals(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
