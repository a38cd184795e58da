// Copyright 2024 syfilter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod build_info;
mod cmd;

use clap::{Parser, Subcommand};
use snafu::Whatever;

use crate::cmd::{generate::GenerateArgs, reset::ResetArgs, show::ShowArgs};

#[derive(Debug, Parser)]
#[clap(
name = "syfilter",
about = "keeps the server side filters of a matrix client",
author = build_info::AUTHOR,
version = build_info::VERSION,
long_version = build_info::LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Generate(GenerateArgs),
    Show(ShowArgs),
    Reset(ResetArgs),
}

fn main() -> Result<(), Whatever> {
    let cli = Cli::parse();
    match cli.commands {
        Commands::Generate(args) => args.run(),
        Commands::Show(args) => args.run(),
        Commands::Reset(args) => args.run(),
    }
}
