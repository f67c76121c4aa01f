//! Generate command implementation

use crate::api::types::GenerationRequest;
use crate::cli::GenerateArgs;
use crate::client::{ArkClient, Interaction, InteractionEvent};
use futures::StreamExt;
use std::io::Write;

/// Splits streamed NDJSON into lines and pulls out the `response` tokens.
#[derive(Debug, Default)]
pub struct TokenDecoder {
    pending: Vec<u8>,
}

impl TokenDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the text of every complete line it closed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut tokens = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(token) = token_of(&line) {
                tokens.push(token);
            }
        }
        tokens
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.pending);
        token_of(&line)
    }
}

fn token_of(line: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(line).ok()?;
    value
        .get("response")
        .and_then(|r| r.as_str())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

fn build_request(args: &GenerateArgs) -> GenerationRequest {
    let mut request = GenerationRequest::new(args.prompt.clone());
    request.system = args.system.clone();
    request.temperature = args.temperature;
    request.max_tokens = args.max_tokens;
    request.model = args.model.clone();
    request
}

/// Handle `ark generate` command
pub async fn handle_generate(args: &GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = ArkClient::new(&args.relay.url);
    let mut interaction = Interaction::new();

    interaction.apply(InteractionEvent::CheckStatus)?;
    let status = client.check_status().await;
    interaction.observe_status(&status)?;
    if !interaction.can_submit() {
        return Err(status.message.into());
    }

    let request = build_request(args);
    interaction.apply(InteractionEvent::Submit)?;

    if args.stream {
        let mut stream = match client.generate_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                interaction.apply(InteractionEvent::Fail)?;
                return Err(e.into());
            }
        };
        interaction.apply(InteractionEvent::ResponseStarted { streaming: true })?;

        let mut decoder = TokenDecoder::new();
        let mut stdout = std::io::stdout();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    interaction.apply(InteractionEvent::Fail)?;
                    return Err(e.into());
                }
            };
            for token in decoder.push(&chunk) {
                write!(stdout, "{}", token)?;
            }
            stdout.flush()?;
        }
        if let Some(token) = decoder.finish() {
            write!(stdout, "{}", token)?;
        }
        writeln!(stdout)?;
    } else {
        let result = match client.generate(&request).await {
            Ok(result) => result,
            Err(e) => {
                interaction.apply(InteractionEvent::Fail)?;
                return Err(e.into());
            }
        };
        interaction.apply(InteractionEvent::ResponseStarted { streaming: false })?;
        println!("{}", result.response);
    }

    interaction.apply(InteractionEvent::ResponseFinished)?;
    Ok(())
}
