mod scenarios;
mod startup;
