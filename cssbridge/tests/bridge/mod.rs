mod errors;
mod identity;
