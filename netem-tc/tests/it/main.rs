mod bridge;
mod helpers;
mod shaper;
