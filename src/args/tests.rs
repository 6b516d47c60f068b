use super::*;
use crate::args::parsers::parse_bool_env;
use crate::error::{AppError, AppResult, ValidationError};
use std::str::FromStr;

mod defaults;
