//! Interactive numeric menu.
//!
//! A synchronous read-eval loop over any `BufRead`/`Write` pair. Every
//! command is one request/response exchange; failures are printed and the
//! loop carries on. End of input ends the session.

use std::io::{self, BufRead, Write};

use courier_core::{ApiError, Person, TlsReport, User};

pub const MENU: &str = "Main Menu\n\
                        1. Get message\n\
                        2. Send file\n\
                        3. Send user\n\
                        4. Print TLS details\n\
                        5. Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetMessage,
    SendFile,
    SendUser,
    TlsDetails,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Command::GetMessage),
            2 => Some(Command::SendFile),
            3 => Some(Command::SendUser),
            4 => Some(Command::TlsDetails),
            5 => Some(Command::Quit),
            _ => None,
        }
    }
}

/// The actions the menu can trigger against a server.
pub trait Session {
    fn get_message(&mut self) -> Result<String, ApiError>;
    fn send_file(&mut self, person: &Person) -> Result<String, ApiError>;
    fn send_user(&mut self, user: &User) -> Result<(), ApiError>;
    fn tls_report(&mut self) -> Result<TlsReport, ApiError>;
}

/// Run the menu until the user quits or input runs out.
pub fn run_menu<S, R, W>(session: &mut S, input: &mut R, output: &mut W) -> io::Result<()>
where
    S: Session,
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "{MENU}")?;
        let Some(line) = prompt(input, output, ">> ")? else {
            return Ok(());
        };
        let Some(command) = Command::parse(&line) else {
            writeln!(output, "Invalid choice")?;
            continue;
        };

        match command {
            Command::GetMessage => match session.get_message() {
                Ok(body) => writeln!(output, "Server: {body}")?,
                Err(err) => report_error(output, &err)?,
            },
            Command::SendFile => {
                let Some(name) = prompt(input, output, "Input name: ")? else {
                    return Ok(());
                };
                let Some(age) = prompt(input, output, "Input age: ")? else {
                    return Ok(());
                };
                let Ok(age) = age.parse::<i64>() else {
                    writeln!(output, "Invalid age")?;
                    continue;
                };
                match session.send_file(&Person { name, age }) {
                    Ok(body) => writeln!(output, "Server: {body}")?,
                    Err(err) => report_error(output, &err)?,
                }
            }
            Command::SendUser => {
                let Some(first) = prompt(input, output, "First name: ")? else {
                    return Ok(());
                };
                let Some(last) = prompt(input, output, "Last name: ")? else {
                    return Ok(());
                };
                match session.send_user(&User { first, last }) {
                    Ok(()) => writeln!(output, "Server: accepted")?,
                    Err(err) => report_error(output, &err)?,
                }
            }
            Command::TlsDetails => match session.tls_report() {
                Ok(report) => writeln!(output, "{report}")?,
                Err(err) => report_error(output, &err)?,
            },
            Command::Quit => return Ok(()),
        }
    }
}

/// Print `label`, read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn report_error<W: Write>(output: &mut W, err: &ApiError) -> io::Result<()> {
    // The user already sees the message on `output`.
    tracing::debug!(error = ?err, "command failed");
    writeln!(output, "Error: {err}")
}
