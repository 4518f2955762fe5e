use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crest_core::ChatBackend;
use crest_core::conversation::{Message, MessageRole};

use super::{Controller, build_controller, env_token};

pub async fn list_conversations() -> Result<()> {
    let mut controller = build_controller()?;
    controller.bootstrap(env_token()).await;
    if !controller.state().is_authenticated() {
        println!("{}", "not signed in".yellow());
        return Ok(());
    }
    print_conversations(&controller);
    Ok(())
}

/// Interactive chat loop. Plain lines are sent as messages; `/`-prefixed
/// lines are commands.
pub async fn run(email: Option<String>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut controller = build_controller()?;
    controller.bootstrap(env_token()).await;

    if !controller.state().is_authenticated() {
        let email = match email {
            Some(email) => email,
            None => editor.readline("Email: ")?,
        };
        let password = editor.readline("Password: ")?;
        controller.backend().login(email.trim(), &password).await?;
        controller.bootstrap(None).await;
    }
    if !controller.state().is_authenticated() {
        bail!("authentication failed");
    }

    if let Some(user) = &controller.state().user {
        println!("{} {}", "signed in as".green().bold(), user.label());
    }
    print_conversations(&controller);
    print_messages(&controller.state().messages);
    println!(
        "{}",
        "type a message, or /list /new <title> /switch <n> /search <query> /logout /quit".dimmed()
    );

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                if let Some(command) = line.strip_prefix('/') {
                    if !handle_command(&mut controller, command).await {
                        break;
                    }
                } else {
                    deliver(&mut controller, &line).await;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Returns false when the loop should end.
async fn handle_command(controller: &mut Controller, command: &str) -> bool {
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "quit" | "q" => return false,
        "logout" => {
            controller.logout().await;
            println!("signed out");
            return false;
        }
        "list" => print_conversations(controller),
        "new" => {
            let title = rest.trim();
            let title = if title.is_empty() { "New chat" } else { title };
            controller.create_conversation(title).await;
            report_error(controller);
            print_conversations(controller);
        }
        "switch" => match rest.trim().parse::<usize>() {
            Ok(index) if index < controller.state().conversations.len() => {
                let conversation = controller.state().conversations[index].clone();
                controller.select_conversation(conversation).await;
                report_error(controller);
                print_messages(&controller.state().messages);
            }
            _ => println!("{}", "usage: /switch <index>".yellow()),
        },
        "search" => {
            controller.search_related(rest).await;
            let related = &controller.state().related;
            if related.is_empty() {
                println!("no related knowledge found");
            }
            for item in related {
                println!("{} {}", "·".cyan(), item.label);
            }
        }
        _ => println!("{}", "unknown command".yellow()),
    }
    true
}

async fn deliver(controller: &mut Controller, text: &str) {
    let before = controller.state().messages.len();
    controller.send_message(text).await;
    report_error(controller);
    // The echo is already on screen as the prompt line; print what arrived.
    for message in controller.state().messages.iter().skip(before) {
        if message.role == MessageRole::Assistant {
            print_message(message);
        }
    }
}

fn report_error(controller: &Controller) {
    if let Some(error) = &controller.state().error {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
}

fn print_conversations(controller: &Controller) {
    let state = controller.state();
    if state.conversations.is_empty() {
        println!("no conversations yet");
        return;
    }
    for (index, conversation) in state.conversations.iter().enumerate() {
        let marker = if state.active_id() == Some(conversation.id.as_str()) {
            "*"
        } else {
            " "
        };
        let title = if conversation.title.is_empty() {
            "(untitled)"
        } else {
            conversation.title.as_str()
        };
        println!("{marker} {index:>2}  {title}  {}", conversation.id.dimmed());
    }
}

fn print_message(message: &Message) {
    let prefix = match message.role {
        MessageRole::User => "you".blue().bold(),
        MessageRole::Assistant => "assistant".green().bold(),
    };
    println!("{prefix}: {}", message.content);
}

fn print_messages(messages: &[Message]) {
    for message in messages {
        print_message(message);
    }
}
