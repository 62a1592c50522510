use crate::{
    db::blocks::Blocks,
    libs::{
        block::{BlockDetail, BlockDraft, BlockItem, BlockType},
        formatter::format_minutes,
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

#[derive(Debug, Args)]
pub struct BlockArgs {
    #[command(subcommand)]
    command: BlockCommand,
}

#[derive(Debug, Subcommand)]
enum BlockCommand {
    /// Create a block; prompts for anything not given
    Create {
        /// Block name
        name: Option<String>,
        /// Create a roulette whose items are alternative options
        #[arg(short, long)]
        roulette: bool,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Estimated minutes (standard blocks)
        #[arg(short, long, default_value_t = 0)]
        minutes: u32,
        /// Subtask name, or `name[:minutes[:sub1,sub2]]` for a roulette option
        #[arg(short, long = "item")]
        items: Vec<String>,
    },
    /// List top-level blocks
    List,
    /// Show a block with its subtasks or options
    Show { id: i64 },
    /// Replace a block; prompts for anything not given
    Edit {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        minutes: Option<u32>,
        /// Replaces every item when given
        #[arg(short, long = "item")]
        items: Vec<String>,
    },
    /// Delete a block with everything it owns
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: BlockArgs) -> Result<()> {
    match args.command {
        BlockCommand::Create {
            name,
            roulette,
            description,
            minutes,
            items,
        } => handle_create(name, roulette, description, minutes, items),
        BlockCommand::List => handle_list(),
        BlockCommand::Show { id } => handle_show(id),
        BlockCommand::Edit {
            id,
            name,
            description,
            minutes,
            items,
        } => handle_edit(id, name, description, minutes, items),
        BlockCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn handle_create(name: Option<String>, roulette: bool, description: String, minutes: u32, items: Vec<String>) -> Result<()> {
    let draft = match name {
        Some(name) if !items.is_empty() => {
            let block_type = if roulette { BlockType::Roulette } else { BlockType::Standard };
            BlockDraft {
                name,
                description,
                block_type,
                estimated_minutes: minutes,
                items: parse_items(block_type, &items)?,
            }
        }
        name => prompt_draft(name, roulette)?,
    };

    let id = Blocks::new()?.create(&draft)?;
    msg_success!(Message::BlockCreated(format!("{} (#{})", draft.name.trim(), id)));
    Ok(())
}

fn handle_list() -> Result<()> {
    let blocks = Blocks::new()?.list_top_level()?;

    if blocks.is_empty() {
        msg_info!(Message::NoBlocksFound);
        return Ok(());
    }

    msg_print!(Message::BlocksHeader, true);
    View::blocks(&blocks)?;
    Ok(())
}

fn handle_show(id: i64) -> Result<()> {
    let detail = Blocks::new()?.get_with_children(id)?;
    print_detail(&detail)
}

fn handle_edit(id: i64, name: Option<String>, description: Option<String>, minutes: Option<u32>, items: Vec<String>) -> Result<()> {
    let mut blocks = Blocks::new()?;
    let detail = blocks.get_with_children(id)?;
    let mut draft = detail.to_draft();

    let interactive = name.is_none() && description.is_none() && minutes.is_none() && items.is_empty();
    if interactive {
        msg_print!(Message::EditingBlock(detail.block.name.clone()), true);
        draft = prompt_edit(draft)?;
    } else {
        if let Some(name) = name {
            draft.name = name;
        }
        if let Some(description) = description {
            draft.description = description;
        }
        if let Some(minutes) = minutes {
            draft.estimated_minutes = minutes;
        }
        if !items.is_empty() {
            draft.items = parse_items(draft.block_type, &items)?;
        }
    }

    blocks.update(id, &draft)?;
    msg_success!(Message::BlockUpdated(draft.name.trim().to_string()));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let mut blocks = Blocks::new()?;
    let detail = blocks.get_with_children(id)?;

    if !yes {
        let prompt = match detail.block.block_type {
            BlockType::Roulette => Message::ConfirmDeleteRoulette(detail.block.name.clone(), detail.options.len()),
            BlockType::Standard => Message::ConfirmDeleteBlock(detail.block.name.clone()),
        };
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    blocks.delete(id)?;
    msg_success!(Message::BlockDeleted(detail.block.name));
    Ok(())
}

fn print_detail(detail: &BlockDetail) -> Result<()> {
    let block = &detail.block;
    msg_print!(Message::BlockHeader(block.name.clone(), block.block_type.to_string()), true);
    if !block.description.is_empty() {
        msg_print!(block.description);
    }
    if block.block_type == BlockType::Standard {
        msg_print!(Message::EstimatedTime(format_minutes(block.estimated_minutes)));
    }
    if let Some(parent_id) = block.parent_id {
        msg_print!(Message::OptionOf(parent_id));
    }

    if detail.subtasks.is_empty() && detail.options.is_empty() {
        msg_info!(Message::BlockHasNoItems);
        return Ok(());
    }
    View::block_detail(detail)
}

fn parse_items(block_type: BlockType, specs: &[String]) -> Result<Vec<BlockItem>> {
    let items = match block_type {
        BlockType::Standard => specs.iter().map(|spec| BlockItem::new(spec)).collect(),
        BlockType::Roulette => specs
            .iter()
            .map(|spec| BlockItem::from_option_spec(spec))
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(items)
}

fn prompt_draft(name: Option<String>, roulette: bool) -> Result<BlockDraft> {
    let theme = ColorfulTheme::default();

    let name = match name {
        Some(name) => name,
        None => Input::with_theme(&theme)
            .with_prompt(Message::PromptBlockName.to_string())
            .interact_text()?,
    };

    let block_type = if roulette {
        BlockType::Roulette
    } else {
        let types = [BlockType::Standard, BlockType::Roulette];
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptBlockType.to_string())
            .items(&types)
            .default(0)
            .interact()?;
        types[selection]
    };

    let description: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptBlockDescription.to_string())
        .allow_empty(true)
        .interact_text()?;

    let draft = match block_type {
        BlockType::Standard => {
            let minutes = Input::with_theme(&theme)
                .with_prompt(Message::PromptEstimatedMinutes.to_string())
                .default(0u32)
                .interact_text()?;
            BlockDraft::standard(&name, &description, minutes, prompt_subtasks(&[])?)
        }
        BlockType::Roulette => BlockDraft::roulette(&name, &description, prompt_options(&[])?),
    };
    Ok(draft)
}

fn prompt_edit(mut draft: BlockDraft) -> Result<BlockDraft> {
    let theme = ColorfulTheme::default();

    draft.name = Input::with_theme(&theme)
        .with_prompt(Message::PromptBlockName.to_string())
        .default(draft.name.clone())
        .interact_text()?;
    draft.description = Input::with_theme(&theme)
        .with_prompt(Message::PromptBlockDescription.to_string())
        .default(draft.description.clone())
        .allow_empty(true)
        .interact_text()?;
    if draft.block_type == BlockType::Standard {
        draft.estimated_minutes = Input::with_theme(&theme)
            .with_prompt(Message::PromptEstimatedMinutes.to_string())
            .default(draft.estimated_minutes)
            .interact_text()?;
    }

    let replace = Confirm::with_theme(&theme)
        .with_prompt(Message::ConfirmReplaceItems(draft.items.len()).to_string())
        .default(false)
        .interact()?;
    if replace {
        msg_warning!(Message::ItemsWillBeRecreated);
        draft.items = match draft.block_type {
            BlockType::Standard => prompt_subtasks(&draft.items)?,
            BlockType::Roulette => prompt_options(&draft.items)?,
        };
    }
    Ok(draft)
}

/// Reads subtask names until an empty line, offering `current` as defaults.
fn prompt_subtasks(current: &[BlockItem]) -> Result<Vec<BlockItem>> {
    let theme = ColorfulTheme::default();
    msg_print!(Message::EnterSubtasks);
    let mut items = Vec::new();
    let mut index = 0;
    loop {
        let mut input = Input::<String>::with_theme(&theme);
        input = input.with_prompt(Message::PromptSubtask(index + 1).to_string()).allow_empty(true);
        if let Some(existing) = current.get(index) {
            input = input.default(existing.text.clone());
        }
        let text = input.interact_text()?;
        if text.trim().is_empty() {
            break;
        }
        items.push(BlockItem::new(&text));
        index += 1;
    }
    Ok(items)
}

/// Reads roulette options until an empty name.
fn prompt_options(current: &[BlockItem]) -> Result<Vec<BlockItem>> {
    let theme = ColorfulTheme::default();
    msg_print!(Message::EnterOptions);
    let mut items = Vec::new();
    let mut index = 0;
    loop {
        let existing = current.get(index);

        let mut name_input = Input::<String>::with_theme(&theme);
        name_input = name_input.with_prompt(Message::PromptOption(index + 1).to_string()).allow_empty(true);
        if let Some(existing) = existing {
            name_input = name_input.default(existing.text.clone());
        }
        let text = name_input.interact_text()?;
        if text.trim().is_empty() {
            break;
        }

        let minutes = Input::with_theme(&theme)
            .with_prompt(Message::PromptEstimatedMinutes.to_string())
            .default(existing.map(|e| e.minutes).unwrap_or(0))
            .interact_text()?;
        let subtasks: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptOptionSubtasks.to_string())
            .default(existing.map(|e| e.subtasks.join(", ")).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let names: Vec<&str> = subtasks.split(',').collect();
        items.push(BlockItem::new(&text).with_minutes(minutes).with_subtasks(&names));
        index += 1;
    }
    Ok(items)
}
