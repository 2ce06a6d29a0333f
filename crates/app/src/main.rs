mod demo;

use clap::Parser;

use demo::DemoOptions;

fn main() {
    let options = DemoOptions::parse();
    demo::run_demo(&options);
}
