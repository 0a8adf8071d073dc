//! Command vocabulary and registry
//!
//! The vocabulary is a closed enum; the registry maps the canonical
//! upper-case token of each command to its kind.

use std::collections::HashMap;
use std::fmt;

use crate::handlers::{
    AddStock, ApplyDollarCostStrategy, ApplyStrategy, BuyStock, CommandHandler, CreatePortfolio,
    CreateStrategy, DisplayAllPortfolios, DisplayPortfolio, DisplayStocks, HandlerContext, Invest,
    SavePortfolio, SaveSession, SaveStrategy, TotalCostBasis, TotalValue,
};

/// Tokens that end a session gracefully
pub const QUIT_TOKENS: [&str; 2] = ["q", "quit"];

/// Check if a line is a terminal token (`q` / `quit`, any case)
pub fn is_quit_token(token: &str) -> bool {
    let token = token.trim();
    QUIT_TOKENS.iter().any(|q| token.eq_ignore_ascii_case(q))
}

/// Every command the session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    CreatePortfolio,
    DisplayPortfolio,
    BuyStock,
    GetTotalCostBasis,
    GetTotalValue,
    DisplayAllPortfolios,
    Invest,
    AddStock,
    ApplyDollarCostStrategy,
    DisplayStocksInPortfolio,
    SavePortfolio,
    SaveStrategy,
    CreateStrategy,
    ApplyStrategy,
    SaveSession,
}

impl CommandKind {
    /// The vocabulary in listing order
    pub const ALL: [CommandKind; 15] = [
        CommandKind::CreatePortfolio,
        CommandKind::DisplayPortfolio,
        CommandKind::BuyStock,
        CommandKind::GetTotalCostBasis,
        CommandKind::GetTotalValue,
        CommandKind::DisplayAllPortfolios,
        CommandKind::Invest,
        CommandKind::AddStock,
        CommandKind::ApplyDollarCostStrategy,
        CommandKind::DisplayStocksInPortfolio,
        CommandKind::SavePortfolio,
        CommandKind::SaveStrategy,
        CommandKind::CreateStrategy,
        CommandKind::ApplyStrategy,
        CommandKind::SaveSession,
    ];

    /// Canonical upper-case token
    pub fn token(self) -> &'static str {
        match self {
            CommandKind::CreatePortfolio => "CREATE_PORTFOLIO",
            CommandKind::DisplayPortfolio => "DISPLAY_PORTFOLIO",
            CommandKind::BuyStock => "BUY_STOCK",
            CommandKind::GetTotalCostBasis => "GET_TOTAL_COST_BASIS",
            CommandKind::GetTotalValue => "GET_TOTAL_VALUE",
            CommandKind::DisplayAllPortfolios => "DISPLAY_ALL_PORTFOLIOS",
            CommandKind::Invest => "INVEST",
            CommandKind::AddStock => "ADD_STOCK",
            CommandKind::ApplyDollarCostStrategy => "APPLY_DOLLAR_COST_STRATEGY",
            CommandKind::DisplayStocksInPortfolio => "DISPLAY_STOCKS_IN_PORTFOLIO",
            CommandKind::SavePortfolio => "SAVE_PORTFOLIO",
            CommandKind::SaveStrategy => "SAVE_STRATEGY",
            CommandKind::CreateStrategy => "CREATE_STRATEGY",
            CommandKind::ApplyStrategy => "APPLY_STRATEGY",
            CommandKind::SaveSession => "SAVE_SESSION",
        }
    }

    /// Construct the handler for this command over the shared context
    pub fn instantiate<'a>(self, ctx: HandlerContext<'a>) -> Box<dyn CommandHandler + 'a> {
        match self {
            CommandKind::CreatePortfolio => Box::new(CreatePortfolio::new(ctx)),
            CommandKind::DisplayPortfolio => Box::new(DisplayPortfolio::new(ctx)),
            CommandKind::BuyStock => Box::new(BuyStock::new(ctx)),
            CommandKind::GetTotalCostBasis => Box::new(TotalCostBasis::new(ctx)),
            CommandKind::GetTotalValue => Box::new(TotalValue::new(ctx)),
            CommandKind::DisplayAllPortfolios => Box::new(DisplayAllPortfolios::new(ctx)),
            CommandKind::Invest => Box::new(Invest::new(ctx)),
            CommandKind::AddStock => Box::new(AddStock::new(ctx)),
            CommandKind::ApplyDollarCostStrategy => Box::new(ApplyDollarCostStrategy::new(ctx)),
            CommandKind::DisplayStocksInPortfolio => Box::new(DisplayStocks::new(ctx)),
            CommandKind::SavePortfolio => Box::new(SavePortfolio::new(ctx)),
            CommandKind::SaveStrategy => Box::new(SaveStrategy::new(ctx)),
            CommandKind::CreateStrategy => Box::new(CreateStrategy::new(ctx)),
            CommandKind::ApplyStrategy => Box::new(ApplyStrategy::new(ctx)),
            CommandKind::SaveSession => Box::new(SaveSession::new(ctx)),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Token -> command lookup, built once per session
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    entries: HashMap<&'static str, CommandKind>,
}

impl CommandRegistry {
    /// Build the registry with the full vocabulary
    pub fn new() -> Self {
        let entries = CommandKind::ALL
            .iter()
            .map(|kind| (kind.token(), *kind))
            .collect();
        Self { entries }
    }

    /// Resolve a raw input line; `None` means the command is unknown
    pub fn resolve(&self, token: &str) -> Option<CommandKind> {
        self.entries.get(token.trim().to_uppercase().as_str()).copied()
    }

    /// Command tokens in listing order
    pub fn names(&self) -> Vec<&'static str> {
        CommandKind::ALL
            .iter()
            .filter(|kind| self.entries.contains_key(kind.token()))
            .map(|kind| kind.token())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
