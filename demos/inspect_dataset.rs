use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    caption_corpus::example_apps::run_inspect_dataset(std::env::args().skip(1))
}
