fn main() -> Result<(), rotary_knob::AppError> {
    // Set up logging; RUST_LOG=debug shows value changes and snapping
    env_logger::init();

    // Run the knob demo application
    rotary_knob::run_app()
}
