mod dry_run;
mod target;
