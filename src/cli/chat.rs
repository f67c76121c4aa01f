//! Chat command implementation

use crate::cli::ChatArgs;
use crate::client::{ArkClient, Conversation, Interaction, InteractionEvent};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

fn new_conversation(args: &ChatArgs) -> Conversation {
    let mut conversation = Conversation::new();
    if let Some(ref system) = args.system {
        conversation = conversation.with_system_prompt(system.clone());
    }
    if let Some(ref model) = args.model {
        conversation = conversation.with_model(model.clone());
    }
    conversation
}

/// Send one turn, driving the interaction through submit and delivery.
async fn turn(
    client: &ArkClient,
    conversation: &mut Conversation,
    interaction: &mut Interaction,
    message: String,
) -> Result<String, Box<dyn std::error::Error>> {
    interaction.apply(InteractionEvent::Submit)?;
    match conversation.send(client, message).await {
        Ok(reply) => {
            let content = reply.content.clone();
            interaction.apply(InteractionEvent::ResponseStarted { streaming: false })?;
            interaction.apply(InteractionEvent::ResponseFinished)?;
            Ok(content)
        }
        Err(e) => {
            interaction.apply(InteractionEvent::Fail)?;
            Err(e.into())
        }
    }
}

/// Handle `ark chat` command
///
/// With a message argument, sends one turn. Without one, reads turns from
/// stdin until EOF; failed turns are reported and the session continues.
pub async fn handle_chat(args: &ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = ArkClient::new(&args.relay.url);
    let mut interaction = Interaction::new();

    interaction.apply(InteractionEvent::CheckStatus)?;
    let status = client.check_status().await;
    interaction.observe_status(&status)?;
    if !interaction.can_submit() {
        return Err(status.message.into());
    }

    let mut conversation = new_conversation(args);

    if let Some(ref message) = args.message {
        let reply = turn(&client, &mut conversation, &mut interaction, message.clone()).await?;
        println!("{}", reply);
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match turn(&client, &mut conversation, &mut interaction, line).await {
            Ok(reply) => println!("{} {}", "assistant>".cyan().bold(), reply),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                interaction.apply(InteractionEvent::Retry)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Role;
    use crate::cli::RelayArgs;

    #[test]
    fn test_new_conversation_applies_flags() {
        let args = ChatArgs {
            message: Some("hi".into()),
            system: Some("You are terse.".into()),
            model: Some("mistral:7b".into()),
            relay: RelayArgs {
                url: "http://x".into(),
            },
        };
        let mut conversation = new_conversation(&args);
        conversation.push_user("hi");

        let request = conversation.to_request();
        assert_eq!(request.model.as_deref(), Some("mistral:7b"));
        assert_eq!(request.messages[0].role, Role::System);
    }
}
