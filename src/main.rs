/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::process::ExitCode;

use clap::Parser;
use newt::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = newt::run(cli) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
