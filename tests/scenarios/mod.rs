mod mm1;
mod bottleneck;
mod overflow;
mod determinism;
