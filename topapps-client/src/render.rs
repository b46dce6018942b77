/// Plain-text rendering of a [`FeedView`]

use std::fmt::Write;

use crate::view::{AppCard, FeedView};

pub const HEADER: &str = "App | Users | Transactions | Tokens | Usage | Earnings";

const NAME_WIDTH: usize = 28;
const SKELETON: &str = "░░░░░░";

pub fn render(view: &FeedView) -> String {
    let mut out = String::new();

    match view {
        FeedView::Loading { skeletons } => {
            push_line(&mut out, HEADER);
            for _ in 0..*skeletons {
                push_line(
                    &mut out,
                    &row(SKELETON, [SKELETON, SKELETON, SKELETON, SKELETON, SKELETON]),
                );
            }
        }
        FeedView::Error(message) | FeedView::Empty(message) => {
            push_line(&mut out, message);
        }
        FeedView::List { cards, load_more } => {
            push_line(&mut out, HEADER);
            for card in cards {
                render_card(&mut out, card);
            }
            if let Some(load_more) = load_more {
                push_line(&mut out, &format!("[ {} ]", load_more.label()));
            }
        }
    }

    out
}

fn render_card(out: &mut String, card: &AppCard) {
    let metrics = &card.metrics;
    let usage = format!("${}", metrics.usage.text());
    let earnings = format!("${}", metrics.earnings.text());

    push_line(
        out,
        &row(
            &card.name,
            [
                metrics.users.text(),
                metrics.transactions.text(),
                metrics.tokens.text(),
                &usage,
                &earnings,
            ],
        ),
    );
    push_line(out, &format!("    {}  {}", card.homepage, card.href));
    push_line(out, &format!("    {}", card.description));
}

fn row(name: &str, metrics: [&str; 5]) -> String {
    let name: String = name.chars().take(NAME_WIDTH).collect();
    format!(
        "{:<width$} | {:>5} | {:>12} | {:>6} | {:>9} | {:>9}",
        name,
        metrics[0],
        metrics[1],
        metrics[2],
        metrics[3],
        metrics[4],
        width = NAME_WIDTH
    )
}

fn push_line(out: &mut String, line: &str) {
    // writing to a String cannot fail
    let _ = writeln!(out, "{}", line);
}
