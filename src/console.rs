//! Line-oriented menu over a [`BookingRegistry`]. All formatting of engine
//! results lives here; the engine only returns structured data.

use std::fmt::Write as _;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::engine::{BookingRegistry, CancelOutcome, Confirmation, EngineError};
use crate::model::{AvailabilityReport, Hour, OperatingWindow, Reservation, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

enum Step {
    Continue,
    Quit,
}

const MENU: &str = "\n--- Reservations ---\n\
1. Show availability\n\
2. Book a table\n\
3. Cancel a reservation\n\
4. List reservations\n\
5. Quit\n\
--------------------";

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
    format: OutputFormat,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W, format: OutputFormat) -> Self {
        Self {
            lines: reader.lines(),
            out,
            format,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Run the menu until the user quits or input ends.
    pub async fn run(&mut self, registry: &BookingRegistry) -> io::Result<()> {
        loop {
            self.say(MENU).await?;
            let Some(choice) = self.ask("Select an option: ").await? else {
                break;
            };
            let step = match choice.trim() {
                "1" => self.show_availability(registry).await?,
                "2" => self.book(registry).await?,
                "3" => self.cancel(registry).await?,
                "4" => self.list_reservations(registry).await?,
                "5" => Step::Quit,
                other => {
                    self.say(&format!("Unknown option {other:?}, try again.")).await?;
                    Step::Continue
                }
            };
            if let Step::Quit = step {
                break;
            }
        }
        self.say("Goodbye.").await
    }

    async fn show_availability(&mut self, registry: &BookingRegistry) -> io::Result<Step> {
        let Some(date) = self.ask("Date (YYYY-MM-DD): ").await? else {
            return Ok(Step::Quit);
        };
        match registry.list_availability(date.trim()).await {
            Ok(report) => {
                let text = match self.format {
                    OutputFormat::Text => render_availability(&report),
                    OutputFormat::Json => to_json(&report)?,
                };
                self.say(&text).await?;
            }
            Err(e) => self.say(&render_error(&e)).await?,
        }
        Ok(Step::Continue)
    }

    async fn book(&mut self, registry: &BookingRegistry) -> io::Result<Step> {
        let window = registry.window();
        let Some(name) = self.ask("Customer name: ").await? else {
            return Ok(Step::Quit);
        };
        let Some(date) = self.ask("Date (YYYY-MM-DD): ").await? else {
            return Ok(Step::Quit);
        };
        let prompt = format!("Hour ({}-{}): ", window.open, window.close);
        let Some(raw_hour) = self.ask(&prompt).await? else {
            return Ok(Step::Quit);
        };
        let Some(hour) = self.hour(&raw_hour, window).await? else {
            return Ok(Step::Continue);
        };
        let Some(raw_table) = self.ask("Table number: ").await? else {
            return Ok(Step::Quit);
        };
        let Some(table) = self.table_number(&raw_table).await? else {
            return Ok(Step::Continue);
        };

        match registry.book_table(&name, date.trim(), hour, table).await {
            Ok(reservation) => {
                let text = match self.format {
                    OutputFormat::Text => format!("Booked. {reservation}"),
                    OutputFormat::Json => to_json(&reservation)?,
                };
                self.say(&text).await?;
            }
            Err(e) => self.say(&render_error(&e)).await?,
        }
        Ok(Step::Continue)
    }

    async fn cancel(&mut self, registry: &BookingRegistry) -> io::Result<Step> {
        let window = registry.window();
        let Some(folio) = self.ask("Folio (e.g. VX6, GX2): ").await? else {
            return Ok(Step::Quit);
        };
        let Some(date) = self.ask("Date (YYYY-MM-DD): ").await? else {
            return Ok(Step::Quit);
        };
        let prompt = format!("Hour ({}-{}): ", window.open, window.close);
        let Some(raw_hour) = self.ask(&prompt).await? else {
            return Ok(Step::Quit);
        };
        let Some(hour) = self.hour(&raw_hour, window).await? else {
            return Ok(Step::Continue);
        };

        let date = date.trim();
        let target = match registry.find_reservation(date, hour, &folio).await {
            Ok(r) => r,
            Err(e) => {
                self.say(&render_error(&e)).await?;
                return Ok(Step::Continue);
            }
        };
        let Some(answer) = self.ask(&format!("Cancel {target}? (y/n): ")).await? else {
            return Ok(Step::Quit);
        };
        let decision = Confirmation::from(is_yes(&answer));

        match registry.cancel_reservation(date, hour, &folio, decision).await {
            Ok(CancelOutcome::Removed(r)) => {
                self.say(&format!("Cancelled the reservation for {}.", r.customer_name()))
                    .await?
            }
            Ok(CancelOutcome::Declined(_)) => self.say("Cancellation aborted.").await?,
            Err(e) => self.say(&render_error(&e)).await?,
        }
        Ok(Step::Continue)
    }

    async fn list_reservations(&mut self, registry: &BookingRegistry) -> io::Result<Step> {
        let reservations = registry.list_reservations().await;
        let text = match self.format {
            OutputFormat::Text => render_reservations(&reservations),
            OutputFormat::Json => to_json(&reservations)?,
        };
        self.say(&text).await?;
        Ok(Step::Continue)
    }

    /// Parse a whole number; blank input counts as 0 so the engine reports
    /// it as missing. Prints a message and yields None on garbage.
    /// Hours that do not even fit the engine's type are reported the same
    /// way the engine reports any hour outside the window.
    async fn hour(&mut self, raw: &str, window: OperatingWindow) -> io::Result<Option<Hour>> {
        let Some(n) = self.whole_number(raw, "hour").await? else {
            return Ok(None);
        };
        match Hour::try_from(n) {
            Ok(hour) => Ok(Some(hour)),
            Err(_) => {
                let err = EngineError::InvalidHour { hour: n, window };
                self.say(&render_error(&err)).await?;
                Ok(None)
            }
        }
    }

    async fn table_number(&mut self, raw: &str) -> io::Result<Option<TableId>> {
        let Some(n) = self.whole_number(raw, "table number").await? else {
            return Ok(None);
        };
        match TableId::try_from(n) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.say("Invalid table number: must be a positive whole number.")
                    .await?;
                Ok(None)
            }
        }
    }

    /// Blank input becomes 0 so the engine reports the field as missing.
    async fn whole_number(&mut self, raw: &str, what: &str) -> io::Result<Option<i64>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Some(0));
        }
        match raw.parse() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                self.say(&format!("Invalid {what}: must be a whole number.")).await?;
                Ok(None)
            }
        }
    }

    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        self.lines.next_line().await
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn to_json<T: serde::Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

pub fn render_availability(report: &AvailabilityReport) -> String {
    let mut out = format!("--- Availability for {} ---\n", report.date);
    for table in &report.tables {
        let _ = writeln!(out, "\n{}:", table.table);
        for status in &table.hours {
            let state = if status.free { "free" } else { "booked" };
            let _ = writeln!(out, "  {}:00-{}:00 -> {state}", status.hour, status.hour + 1);
        }
    }
    out.push_str("-----------------------------");
    out
}

pub fn render_reservations(reservations: &[Reservation]) -> String {
    if reservations.is_empty() {
        return "No active reservations.".to_string();
    }
    reservations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_error(err: &EngineError) -> String {
    format!("Error: {err}")
}
