mod contract_tests;
