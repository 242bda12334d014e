use std::io::{self, BufRead, Write};

use waypoint_shared::{BookingRequest, TransportationMode};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input closed before the booking details were complete")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Collects destination, transport mode and seat count, re-asking until
/// each answer is valid.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask_request(&mut self) -> Result<BookingRequest, PromptError> {
        let destination = self.ask_destination()?;
        let mode = self.ask_transportation_mode()?;
        let seats = self.ask_seat_count()?;
        Ok(BookingRequest::new(destination, mode, seats))
    }

    pub fn ask_destination(&mut self) -> Result<String, PromptError> {
        loop {
            writeln!(self.output, "Please enter the destination city you want to travel to:")?;
            let line = self.read_line()?;
            if !line.is_empty() {
                return Ok(line);
            }
            writeln!(self.output, "The destination cannot be empty.")?;
        }
    }

    pub fn ask_transportation_mode(&mut self) -> Result<TransportationMode, PromptError> {
        loop {
            writeln!(self.output, "Please choose a transportation mode:")?;
            writeln!(self.output, " 1. Plane")?;
            writeln!(self.output, " 2. Train")?;
            writeln!(self.output, " 3. Bus")?;

            let line = self.read_line()?;
            match line.parse().ok().and_then(TransportationMode::from_menu_choice) {
                Some(mode) => return Ok(mode),
                None => writeln!(self.output, "Invalid choice, please try again")?,
            }
        }
    }

    pub fn ask_seat_count(&mut self) -> Result<u32, PromptError> {
        loop {
            writeln!(self.output, "Please enter the number of seats you want to book:")?;
            match self.read_line()?.parse::<u32>() {
                Ok(seats) if seats > 0 => return Ok(seats),
                _ => writeln!(self.output, "Please enter a positive whole number.")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }
}
