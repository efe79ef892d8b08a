mod test_chain_basic;
