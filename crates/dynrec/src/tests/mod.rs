mod json;
mod properties;
