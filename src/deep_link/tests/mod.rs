mod click_scenarios;
