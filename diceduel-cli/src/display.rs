use comfy_table::{presets::UTF8_FULL, Table};
use diceduel_game::{RoundReport, SessionOutcome, SessionState, Standings};

pub fn standings_table(standings: &Standings) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Player", "Balance"]);
    table.add_row(vec![
        format!("{} (you)", standings.local_name),
        format!("${}", standings.local_balance),
    ]);
    table.add_row(vec![
        standings.remote_name.clone(),
        format!("${}", standings.remote_balance),
    ]);
    table
}

pub fn print_report(report: &RoundReport, opponent: &str) {
    println!();
    println!("Round {}: the die shows {}", report.round, report.outcome);
    println!(
        "  You guessed {} for ${}, {} guessed {} for ${}",
        report.local.guess, report.local.stake, opponent, report.remote.guess, report.remote.stake
    );
    println!("  {}", report.rule.describe());
    println!(
        "  You: {:+}, {}: {:+}",
        report.local_delta, opponent, report.remote_delta
    );
    if report.diverged {
        println!(
            "  Warning: {} reported a balance of ${} which does not match this round's payout",
            opponent, report.remote_balance
        );
    }
}

pub fn print_outcome(outcome: &SessionOutcome) {
    println!();
    match &outcome.state {
        SessionState::RoundAborted(reason) => println!("Game ended by opponent: {}", reason),
        SessionState::BalanceDepleted => println!("A player ran out of money."),
        SessionState::UserQuit => println!("You left the game."),
        SessionState::Failed(err) => println!("Game ended on an error: {}", err),
        SessionState::Playing => {}
    }

    println!("Game Over after {} rounds.", outcome.rounds);
    println!("{}", standings_table(&outcome.standings));
}
