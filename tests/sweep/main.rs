mod helpers;
mod remote;
