mod card;
mod info;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use card::CardView;
pub use info::InfoView;
